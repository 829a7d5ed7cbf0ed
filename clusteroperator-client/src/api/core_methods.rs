use futures::Stream;
use http::Method;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

use crate::{api::Api, Error, Result};
use clusteroperator_core::{
    object::ObjectList,
    params::{DeleteOptions, GetOptions, ListOptions, PatchType},
    HasStatus, Request, Resource, WatchEvent,
};

/// PUSH/PUT/POST/GET abstractions
impl<K> Api<K>
where
    K: Resource + Clone + DeserializeOwned + Debug,
{
    /// Get a named resource
    ///
    /// ```no_run
    /// # use clusteroperator_client::{Api, api::GetOptions};
    /// use clusteroperator_core::MachineSet;
    /// # async fn wrapper() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client: clusteroperator_client::Client = todo!();
    /// let machinesets: Api<MachineSet> = Api::namespaced(client, "cluster-ops");
    /// let ms: MachineSet = machinesets.get("masters", &GetOptions::default()).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// A missing object is reported as [`Error::Api`] with a `404` status, like any other failure.
    pub async fn get(&self, name: &str, gp: &GetOptions) -> Result<K> {
        let mut req = self
            .request(Method::GET)
            .name(name)
            .params(gp, self.client.parameter_codec())
            .build()
            .map_err(Error::BuildRequest)?;
        req.extensions_mut().insert("get");
        self.client.request::<K>(req).await
    }

    /// Get a list of resources
    ///
    /// You use this to get everything, or a subset matching fields/labels, say:
    ///
    /// ```no_run
    /// use clusteroperator_client::{api::{Api, ListOptions, ResourceExt}, Client};
    /// use clusteroperator_core::MachineSet;
    /// # async fn wrapper() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client: Client = todo!();
    /// let machinesets: Api<MachineSet> = Api::namespaced(client, "cluster-ops");
    /// let lo = ListOptions::default().labels("clusteroperator.openshift.io/cluster=prod");
    /// for ms in machinesets.list(&lo).await? {
    ///     println!("Found MachineSet: {}", ms.name_any());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(&self, lp: &ListOptions) -> Result<ObjectList<K>> {
        let mut req = self
            .request(Method::GET)
            .params(lp, self.client.parameter_codec())
            .build()
            .map_err(Error::BuildRequest)?;
        req.extensions_mut().insert("list");
        self.client.request::<ObjectList<K>>(req).await
    }

    /// Watch a list of resources
    ///
    /// The `watch` flag is always sent as `true`, whatever `lp` says.
    /// `lp` itself is left untouched.
    ///
    /// The stream ends when the server closes the response, and it is not restarted.
    /// Callers that need a long running watch resume from the last seen resource version.
    ///
    /// ```no_run
    /// use clusteroperator_client::{api::{Api, ListOptions, ResourceExt, WatchEvent}, Client};
    /// use clusteroperator_core::MachineSet;
    /// use futures::{StreamExt, TryStreamExt};
    /// # async fn wrapper() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client: Client = todo!();
    /// let machinesets: Api<MachineSet> = Api::namespaced(client, "cluster-ops");
    /// let lo = ListOptions::default().timeout(60);
    /// let mut stream = machinesets.watch(&lo).await?.boxed();
    /// while let Some(status) = stream.try_next().await? {
    ///     match status {
    ///         WatchEvent::Added(ms) => println!("Added {}", ms.name_any()),
    ///         WatchEvent::Modified(ms) => println!("Modified: {}", ms.name_any()),
    ///         WatchEvent::Deleted(ms) => println!("Deleted {}", ms.name_any()),
    ///         WatchEvent::Bookmark(_) => {},
    ///         WatchEvent::Error(e) => println!("Error {}", e),
    ///     }
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn watch(&self, lp: &ListOptions) -> Result<impl Stream<Item = Result<WatchEvent<K>>>> {
        let mut lp = lp.clone();
        lp.watch = true;
        let mut req = self
            .request(Method::GET)
            .params(&lp, self.client.parameter_codec())
            .build()
            .map_err(Error::BuildRequest)?;
        req.extensions_mut().insert("watch");
        self.client.request_events::<K>(req).await
    }

    /// Delete a named resource
    ///
    /// The options are sent as the request body. The response body is not decoded,
    /// so this returns as soon as the server accepted the deletion.
    ///
    /// ```no_run
    /// use clusteroperator_client::{api::{Api, DeleteOptions}, Client};
    /// use clusteroperator_core::MachineSet;
    /// # async fn wrapper() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client: Client = todo!();
    /// let machinesets: Api<MachineSet> = Api::namespaced(client, "cluster-ops");
    /// machinesets.delete("masters", &DeleteOptions::background()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn delete(&self, name: &str, dp: &DeleteOptions) -> Result<()> {
        let mut req = self
            .request(Method::DELETE)
            .name(name)
            .json_body(dp)
            .build()
            .map_err(Error::BuildRequest)?;
        req.extensions_mut().insert("delete");
        self.client.request_text(req).await?;
        Ok(())
    }

    /// Delete a collection of resources
    ///
    /// The list options select what to delete and go into the query.
    /// Their `watch` flag is forwarded as given.
    /// The delete options go into the request body.
    ///
    /// ```no_run
    /// use clusteroperator_client::{api::{Api, DeleteOptions, ListOptions}, Client};
    /// use clusteroperator_core::MachineSet;
    /// # async fn wrapper() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client: Client = todo!();
    /// let machinesets: Api<MachineSet> = Api::namespaced(client, "cluster-ops");
    /// let lo = ListOptions::default().labels("clusteroperator.openshift.io/cluster=old");
    /// machinesets.delete_collection(&DeleteOptions::foreground(), &lo).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn delete_collection(&self, dp: &DeleteOptions, lp: &ListOptions) -> Result<()> {
        let mut req = self
            .request(Method::DELETE)
            .params(lp, self.client.parameter_codec())
            .json_body(dp)
            .build()
            .map_err(Error::BuildRequest)?;
        req.extensions_mut().insert("delete_collection");
        self.client.request_text(req).await?;
        Ok(())
    }

    /// Patch a resource or one of its subresources
    ///
    /// `data` is sent verbatim with the content type of `patch_type`.
    /// `subresources` are appended after the name in order; an empty slice patches the object itself.
    ///
    /// ```no_run
    /// use clusteroperator_client::{api::{Api, PatchType}, Client};
    /// use clusteroperator_core::MachineSet;
    /// # async fn wrapper() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client: Client = todo!();
    /// let machinesets: Api<MachineSet> = Api::namespaced(client, "cluster-ops");
    /// let patch = serde_json::json!({ "spec": { "size": 5 } });
    /// let data = serde_json::to_vec(&patch)?;
    /// let ms = machinesets.patch("compute", PatchType::Merge, data, &[]).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn patch(
        &self,
        name: &str,
        patch_type: PatchType,
        data: Vec<u8>,
        subresources: &[&str],
    ) -> Result<K> {
        let mut req = Request::patch(K::api_root(), patch_type)
            .namespace(self.namespace())
            .resource(K::PLURAL)
            .name(name)
            .subresource(subresources)
            .body(data)
            .build()
            .map_err(Error::BuildRequest)?;
        req.extensions_mut().insert("patch");
        self.client.request::<K>(req).await
    }
}

/// Writes that send the whole object
impl<K> Api<K>
where
    K: Resource + Clone + DeserializeOwned + Serialize + Debug,
{
    /// Create a resource
    ///
    /// The object is sent as is; the namespace of the handle decides where it lands.
    ///
    /// ```no_run
    /// use clusteroperator_client::{api::Api, Client};
    /// use clusteroperator_core::{machineset::NodeType, MachineSet, MachineSetSpec};
    /// # async fn wrapper() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client: Client = todo!();
    /// let machinesets: Api<MachineSet> = Api::namespaced(client, "cluster-ops");
    /// let ms = MachineSet::new("masters", MachineSetSpec {
    ///     node_type: NodeType::Master,
    ///     size: 3,
    ///     ..MachineSetSpec::default()
    /// });
    /// let created = machinesets.create(&ms).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(&self, data: &K) -> Result<K> {
        let mut req = self
            .request(Method::POST)
            .json_body(data)
            .build()
            .map_err(Error::BuildRequest)?;
        req.extensions_mut().insert("create");
        self.client.request::<K>(req).await
    }

    /// Replace a resource entirely with a new one
    ///
    /// The instance is addressed by `data.metadata.name`; an unnamed object fails
    /// with [`Error::BuildRequest`] before anything is sent.
    /// Changes to the status are ignored by the server, use [`Api::update_status`] for those.
    pub async fn update(&self, data: &K) -> Result<K> {
        let mut req = self
            .request(Method::PUT)
            .name(data.meta().name.as_deref().unwrap_or_default())
            .json_body(data)
            .build()
            .map_err(Error::BuildRequest)?;
        req.extensions_mut().insert("update");
        self.client.request::<K>(req).await
    }
}

/// Status subresource
impl<K> Api<K>
where
    K: Resource + HasStatus + Clone + DeserializeOwned + Serialize + Debug,
{
    /// Replace the status of a resource
    ///
    /// Identical to [`Api::update`] except that the request targets the `status` subresource,
    /// so only the status of `data` is persisted.
    ///
    /// ```no_run
    /// use clusteroperator_client::{api::{Api, GetOptions}, Client};
    /// use clusteroperator_core::{MachineSet, MachineSetStatus};
    /// # async fn wrapper() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client: Client = todo!();
    /// let machinesets: Api<MachineSet> = Api::namespaced(client, "cluster-ops");
    /// let mut ms = machinesets.get("masters", &GetOptions::default()).await?;
    /// ms.status = Some(MachineSetStatus { replicas: 3, ..Default::default() });
    /// let ms = machinesets.update_status(&ms).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn update_status(&self, data: &K) -> Result<K> {
        let mut req = self
            .request(Method::PUT)
            .name(data.meta().name.as_deref().unwrap_or_default())
            .subresource(["status"])
            .json_body(data)
            .build()
            .map_err(Error::BuildRequest)?;
        req.extensions_mut().insert("update_status");
        self.client.request::<K>(req).await
    }
}
