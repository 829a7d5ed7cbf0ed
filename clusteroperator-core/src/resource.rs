pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

use std::{borrow::Cow, collections::BTreeMap};

pub use k8s_openapi::{NamespaceResourceScope, ResourceScope};

/// An accessor trait for a resource kind served by the api server.
///
/// This is for a subset of types that do not end in `List`.
/// These types, using [`ObjectMeta`], SHOULD all have required properties:
/// - `.metadata`
/// - `.metadata.name`
///
/// And these optional properties:
/// - `.metadata.namespace`
/// - `.metadata.resource_version`
pub trait Resource {
    /// The api scope of the resource
    ///
    /// Namespaced kinds select [`NamespaceResourceScope`], which is required for
    /// [`Api::namespaced`](https://docs.rs/clusteroperator-client/*/clusteroperator_client/struct.Api.html).
    type Scope: ResourceScope;

    /// Kind of this object
    const KIND: &'static str;
    /// Api group of this object, empty for the legacy core group
    const GROUP: &'static str;
    /// Version of this object
    const VERSION: &'static str;
    /// The plural name of the kind
    ///
    /// This is known as the resource in apimachinery, we rename it for disambiguation.
    const PLURAL: &'static str;

    /// Returns apiVersion of this object
    fn api_version() -> Cow<'static, str> {
        if Self::GROUP.is_empty() {
            return Self::VERSION.into();
        }
        format!("{}/{}", Self::GROUP, Self::VERSION).into()
    }

    /// The root every request path for this kind starts from
    ///
    /// `/api/{version}` for the legacy core group, `/apis/{group}/{version}` otherwise.
    fn api_root() -> String {
        if Self::GROUP.is_empty() {
            format!("/api/{}", Self::VERSION)
        } else {
            format!("/apis/{}/{}", Self::GROUP, Self::VERSION)
        }
    }

    /// Creates a url path for the collection of this resource
    fn url_path(namespace: Option<&str>) -> String {
        let n = if let Some(ns) = namespace {
            format!("namespaces/{ns}/")
        } else {
            "".into()
        };
        format!("{}/{}{}", Self::api_root(), n, Self::PLURAL)
    }

    /// Metadata that all persisted resources must have
    fn meta(&self) -> &ObjectMeta;
    /// Metadata that all persisted resources must have
    fn meta_mut(&mut self) -> &mut ObjectMeta;
}

/// A trait to access the `status` of a resource.
///
/// Only kinds that declare a status subresource implement this,
/// which is what makes `update_status` available on their api.
pub trait HasStatus {
    /// The type of the `status` object
    type Status;

    /// Returns an optional reference to the `status` of the object
    fn status(&self) -> Option<&Self::Status>;

    /// Returns an optional mutable reference to the `status` of the object
    fn status_mut(&mut self) -> &mut Option<Self::Status>;
}

static EMPTY_MAP: BTreeMap<String, String> = BTreeMap::new();

/// Helper methods for resources.
pub trait ResourceExt: Resource {
    /// The name of the resource, or its `generate_name`, or an empty string
    ///
    /// This is intended to provide something quick and simple for standard logging purposes.
    fn name_any(&self) -> String;
    /// The namespace the resource is in
    fn namespace(&self) -> Option<String>;
    /// The resource version
    fn resource_version(&self) -> Option<String>;
    /// Unique ID (if you delete resource and then create a new
    /// resource with the same name, it will have different ID)
    fn uid(&self) -> Option<String>;
    /// Returns the creation timestamp
    fn creation_timestamp(&self) -> Option<Time>;
    /// Returns resource labels
    fn labels(&self) -> &BTreeMap<String, String>;
    /// Provides mutable access to the labels
    fn labels_mut(&mut self) -> &mut BTreeMap<String, String>;
}

impl<K: Resource> ResourceExt for K {
    fn name_any(&self) -> String {
        self.meta()
            .name
            .clone()
            .or_else(|| self.meta().generate_name.clone())
            .unwrap_or_default()
    }

    fn namespace(&self) -> Option<String> {
        self.meta().namespace.clone()
    }

    fn resource_version(&self) -> Option<String> {
        self.meta().resource_version.clone()
    }

    fn uid(&self) -> Option<String> {
        self.meta().uid.clone()
    }

    fn creation_timestamp(&self) -> Option<Time> {
        self.meta().creation_timestamp.clone()
    }

    fn labels(&self) -> &BTreeMap<String, String> {
        self.meta().labels.as_ref().unwrap_or(&EMPTY_MAP)
    }

    fn labels_mut(&mut self) -> &mut BTreeMap<String, String> {
        self.meta_mut().labels.get_or_insert_with(BTreeMap::new)
    }
}
