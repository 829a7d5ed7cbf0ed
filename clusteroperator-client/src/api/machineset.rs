use crate::{Api, Client};
use clusteroperator_core::MachineSet;

/// The typed handle for [`MachineSet`] objects in one namespace
pub type MachineSets = Api<MachineSet>;

/// Entry point to [`MachineSets`] handles
///
/// ```no_run
/// use clusteroperator_client::{api::MachineSetsGetter, Client};
/// # async fn wrapper() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::try_default().await?;
/// let machinesets = client.machine_sets("cluster-ops");
/// # Ok(())
/// # }
/// ```
pub trait MachineSetsGetter {
    /// A [`MachineSets`] handle scoped to `namespace`
    fn machine_sets(&self, namespace: &str) -> MachineSets;
}

impl MachineSetsGetter for Client {
    fn machine_sets(&self, namespace: &str) -> MachineSets {
        Api::namespaced(self.clone(), namespace)
    }
}
