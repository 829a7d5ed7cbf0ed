//! Metadata structs shared by objects, lists and watch events.
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ListMeta, ObjectMeta};
use serde::{Deserialize, Serialize};

/// Type information that is flattened into every served object
#[derive(Deserialize, Serialize, Clone, Default, Debug, Eq, PartialEq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    /// The version of the API
    pub api_version: String,

    /// The name of the API
    pub kind: String,
}

impl TypeMeta {
    /// Type information of the list kind for `K`
    pub fn list<K: crate::Resource>() -> Self {
        Self {
            api_version: K::api_version().into_owned(),
            kind: format!("{}List", K::KIND),
        }
    }
}
