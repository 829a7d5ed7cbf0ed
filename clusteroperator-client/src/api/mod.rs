//! API helpers for structured interaction with the cluster operator API

mod core_methods;
mod machineset;
pub use machineset::{MachineSets, MachineSetsGetter};

use std::fmt::Debug;

// Re-exports from clusteroperator-core
pub use clusteroperator_core::{
    metadata::{ListMeta, ObjectMeta, TypeMeta},
    object::ObjectList,
    params::{
        DeleteOptions, GetOptions, ListOptions, PatchType, Preconditions, PropagationPolicy, VersionMatch,
    },
    request::Request,
    watch::WatchEvent,
    HasStatus, Resource, ResourceExt,
};
use clusteroperator_core::NamespaceResourceScope;

use crate::Client;

/// The generic Api abstraction
///
/// This abstracts over a [`Request`] and a type `K` so that
/// we get automatic serialization/deserialization on the api calls
/// implemented by the dynamic [`Resource`].
///
/// A handle is bound to one namespace when it is constructed and never changes it.
/// Cloning a handle is cheap; the underlying [`Client`] is shared.
#[derive(Clone)]
pub struct Api<K> {
    client: Client,
    namespace: String,
    /// Note: Using `iter::Empty` over `PhantomData`, because we never actually keep any
    /// `K` objects, so `Empty` better models our constraints (in particular, `Empty<K>`
    /// is `Send`, even if `K` may not be).
    _phantom: std::iter::Empty<K>,
}

impl<K: Resource> Api<K> {
    /// Namespaced resource within a given namespace
    ///
    /// ```no_run
    /// # use clusteroperator_client::{Api, Client};
    /// use clusteroperator_core::MachineSet;
    /// # async fn wrapper() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client: Client = todo!();
    /// let machinesets: Api<MachineSet> = Api::namespaced(client, "cluster-ops");
    /// # Ok(())
    /// # }
    /// ```
    pub fn namespaced(client: Client, ns: &str) -> Self
    where
        K: Resource<Scope = NamespaceResourceScope>,
    {
        Self {
            client,
            namespace: ns.to_string(),
            _phantom: std::iter::empty(),
        }
    }

    /// Namespaced resource within the default namespace
    ///
    /// The namespace is taken from the [`Config`](crate::Config) the client was built from,
    /// or the namespace passed to [`Client::new`].
    pub fn default_namespaced(client: Client) -> Self
    where
        K: Resource<Scope = NamespaceResourceScope>,
    {
        let ns = client.default_namespace().to_string();
        Self::namespaced(client, &ns)
    }

    /// The namespace every request of this handle targets
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Consume self and return the [`Client`]
    pub fn into_client(self) -> Client {
        self.into()
    }

    /// Return a reference to the current resource url path
    pub fn resource_url(&self) -> String {
        K::url_path(Some(&self.namespace))
    }

    // Start a request scoped to this handle's namespace and collection
    fn request(&self, method: http::Method) -> Request {
        Request::new(method, K::api_root())
            .namespace(&self.namespace)
            .resource(K::PLURAL)
    }
}

impl<K> From<Api<K>> for Client {
    fn from(api: Api<K>) -> Self {
        api.client
    }
}

impl<K> Debug for Api<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Intentionally destructuring, to cause compile errors when new fields are added
        let Self {
            client: _,
            namespace,
            _phantom,
        } = self;
        f.debug_struct("Api")
            .field("client", &"...")
            .field("namespace", &namespace)
            .finish()
    }
}
