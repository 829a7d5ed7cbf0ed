#![allow(missing_docs)]
use futures::{StreamExt, TryStreamExt};
use tracing::*;

use clusteroperator::{
    api::{Api, ListOptions, ResourceExt, WatchEvent},
    core::MachineSet,
    Client,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,clusteroperator_client=debug".into()))
        .init();
    let client = Client::try_default().await?;
    let machinesets: Api<MachineSet> = Api::default_namespaced(client);

    // A single watch call; it ends when the server closes it after the timeout
    let lo = ListOptions::default().timeout(290).bookmarks();
    let mut stream = machinesets.watch(&lo).await?.boxed();
    while let Some(event) = stream.try_next().await? {
        match event {
            WatchEvent::Added(ms) | WatchEvent::Modified(ms) => {
                let ready = ms.status.as_ref().map_or(0, |s| s.ready_replicas);
                info!("{} has {}/{} machines ready", ms.name_any(), ready, ms.spec.size);
            }
            WatchEvent::Deleted(ms) => info!("deleted {}", ms.name_any()),
            WatchEvent::Bookmark(bm) => debug!("at resource version {}", bm.metadata.resource_version),
            WatchEvent::Error(e) => warn!("watch error {}", e),
        }
    }
    Ok(())
}
