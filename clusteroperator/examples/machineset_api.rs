#![allow(missing_docs)]
use futures::{StreamExt, TryStreamExt};
use serde_json::json;
use tracing::*;

use clusteroperator::{
    api::{
        DeleteOptions, GetOptions, ListOptions, MachineSetsGetter, PatchType, ResourceExt, WatchEvent,
    },
    core::{machineset::NodeType, MachineSet, MachineSetSpec, MachineSetStatus},
    Client,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let client = Client::try_default().await?;
    let namespace = std::env::var("NAMESPACE").unwrap_or_else(|_| client.default_namespace().into());

    let machinesets = client.machine_sets(&namespace);
    for ms in machinesets.list(&ListOptions::default()).await? {
        info!("found MachineSet {}", ms.name_any());
    }

    info!("Creating MachineSet compute");
    let ms = MachineSet::new("compute", MachineSetSpec {
        node_type: NodeType::Compute,
        size: 2,
        ..MachineSetSpec::default()
    });
    match machinesets.create(&ms).await {
        Ok(o) => {
            assert_eq!(ms.name_any(), o.name_any());
            info!("Created {}", o.name_any());
        }
        Err(clusteroperator::Error::Api(ae)) => assert_eq!(ae.code, 409), // already exists
        Err(e) => return Err(e.into()),
    }

    // Watch it for a few seconds
    let lo = ListOptions::default().fields("metadata.name=compute").timeout(10);
    let mut stream = machinesets.watch(&lo).await?.boxed();
    while let Some(event) = stream.try_next().await? {
        match event {
            WatchEvent::Added(o) => info!("Added {}", o.name_any()),
            WatchEvent::Modified(o) => info!("Modified {} to size {}", o.name_any(), o.spec.size),
            WatchEvent::Deleted(o) => info!("Deleted {}", o.name_any()),
            WatchEvent::Error(e) => error!("Error {}", e),
            WatchEvent::Bookmark(_) => {}
        }
    }

    info!("Patch MachineSet compute");
    let patch = serde_json::to_vec(&json!({ "spec": { "size": 3 } }))?;
    let patched = machinesets.patch("compute", PatchType::Merge, patch, &[]).await?;
    assert_eq!(patched.spec.size, 3);

    info!("Update status of MachineSet compute");
    let mut current = machinesets.get("compute", &GetOptions::default()).await?;
    current.status = Some(MachineSetStatus {
        replicas: current.spec.size,
        ..MachineSetStatus::default()
    });
    let updated = machinesets.update_status(&current).await?;
    info!("status is now {:?}", updated.status);

    info!("Delete MachineSet compute");
    machinesets.delete("compute", &DeleteOptions::background()).await?;
    match machinesets.get("compute", &GetOptions::default()).await {
        Err(e) if e.status() == Some(http::StatusCode::NOT_FOUND) => info!("compute is gone"),
        Ok(o) => info!("compute is still terminating: {:?}", o.metadata.deletion_timestamp),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
