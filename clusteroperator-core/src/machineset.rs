//! The `MachineSet` kind of the `clusteroperator.openshift.io` api group
use crate::{
    metadata::{ObjectMeta, TypeMeta},
    object::ObjectList,
    resource::{HasStatus, NamespaceResourceScope, Resource},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A set of machines of one node type within a cluster
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct MachineSet {
    /// The type fields, not always present
    #[serde(flatten, default)]
    pub types: Option<TypeMeta>,

    /// Resource metadata
    #[serde(default)]
    pub metadata: ObjectMeta,

    /// The desired state of the machine set
    #[serde(default)]
    pub spec: MachineSetSpec,

    /// The observed state of the machine set
    ///
    /// Only written through the status subresource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MachineSetStatus>,
}

/// Desired state of a [`MachineSet`]
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MachineSetSpec {
    /// The role of the machines in the set
    #[serde(default)]
    pub node_type: NodeType,

    /// Whether the machines run infrastructure workloads
    #[serde(default)]
    pub infra: bool,

    /// Number of machines in the set
    #[serde(default)]
    pub size: i32,

    /// Labels applied to the nodes backed by this set
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_labels: BTreeMap<String, String>,
}

/// Role of the machines in a [`MachineSet`]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeType {
    /// Control plane machines
    Master,
    /// Worker machines
    #[default]
    Compute,
}

/// Observed state of a [`MachineSet`]
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MachineSetStatus {
    /// Number of machines currently provisioned
    #[serde(default)]
    pub replicas: i32,

    /// Number of machines whose node is ready
    #[serde(default)]
    pub ready_replicas: i32,

    /// The generation last acted on by the controller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

/// A list of [`MachineSet`] objects
pub type MachineSetList = ObjectList<MachineSet>;

impl MachineSet {
    /// A new machine set with a name and a spec
    pub fn new(name: &str, spec: MachineSetSpec) -> Self {
        Self {
            types: Some(TypeMeta {
                api_version: <Self as Resource>::api_version().into_owned(),
                kind: Self::KIND.into(),
            }),
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..ObjectMeta::default()
            },
            spec,
            status: None,
        }
    }
}

impl Resource for MachineSet {
    type Scope = NamespaceResourceScope;

    const GROUP: &'static str = "clusteroperator.openshift.io";
    const KIND: &'static str = "MachineSet";
    const PLURAL: &'static str = "machinesets";
    const VERSION: &'static str = "v1alpha1";

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

impl HasStatus for MachineSet {
    type Status = MachineSetStatus;

    fn status(&self) -> Option<&MachineSetStatus> {
        self.status.as_ref()
    }

    fn status_mut(&mut self) -> &mut Option<MachineSetStatus> {
        &mut self.status
    }
}
