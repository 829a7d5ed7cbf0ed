//! Crate for interacting with the cluster operator API
//!
//! This crate includes the tools for manipulating `MachineSet` objects
//! through a typed, namespace scoped handle, built on a [`tower`] service stack.
//!
//! The [`Client`] is the transport, shared by every handle created from it.
//! The [`Api`] type binds a client to one namespace and one resource kind and
//! exposes get, list, watch, create, update, update_status, delete,
//! delete_collection and patch on it.
//!
//! # Example
//!
//! ```rust,no_run
//! use clusteroperator_client::{api::{GetOptions, ListOptions, MachineSetsGetter, ResourceExt}, Client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Read the environment to find the api server
//!     let client = Client::try_default().await?;
//!
//!     // A handle for MachineSets in the "cluster-ops" namespace
//!     let machinesets = client.machine_sets("cluster-ops");
//!
//!     for ms in machinesets.list(&ListOptions::default()).await? {
//!         println!("found MachineSet {}", ms.name_any());
//!     }
//!
//!     let masters = machinesets.get("masters", &GetOptions::default()).await?;
//!     println!("masters has {} machines", masters.spec.size);
//!     Ok(())
//! }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod client;
pub mod config;
pub mod error;

#[doc(inline)]
pub use api::Api;
#[doc(inline)]
pub use client::Client;
#[doc(inline)]
pub use config::Config;
#[doc(inline)]
pub use error::Error;

/// Convient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub use crate::core::{HasStatus, Resource, ResourceExt};
/// Re-exports from clusteroperator_core
pub use clusteroperator_core as core;
