//! Clusteroperator is an umbrella-crate for typed access to the `MachineSet` resources
//! of the `clusteroperator.openshift.io` api group.
//!
//! # Overview
//!
//! The main modules are:
//!
//! - [`client`](crate::client) with the [`Client`](crate::Client) transport and its layers
//! - [`config`](crate::config) for cluster [`Config`](crate::Config)
//! - [`api`](crate::api) with the generic [`Api`](crate::Api) handle and the `MachineSets` facade
//! - [`core`](crate::core) with the `MachineSet` types, option types, the request builder and the parameter codec
//!
//! # Using the Client
//! ```no_run
//! use futures::{StreamExt, TryStreamExt};
//! use clusteroperator::{Client, api::{ListOptions, MachineSetsGetter, ResourceExt, WatchEvent}};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Infer the runtime environment and try to create a Client
//!     let client = Client::try_default().await?;
//!
//!     // Read machinesets in the configured namespace
//!     let machinesets = client.machine_sets(client.default_namespace());
//!     for ms in machinesets.list(&ListOptions::default()).await? {
//!         println!("found machineset {}", ms.name_any());
//!     }
//!
//!     // Follow changes until the server ends the watch
//!     let mut events = machinesets.watch(&ListOptions::default().timeout(30)).await?.boxed();
//!     while let Some(ev) = events.try_next().await? {
//!         if let WatchEvent::Modified(ms) = ev {
//!             println!("modified {}", ms.name_any());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! For details, see:
//!
//! - [`Client`](crate::client) for the extensible client
//! - [`Api`](crate::Api) for the generic api methods available on resources
//! - [`ParameterCodec`](crate::core::ParameterCodec) for how option objects reach the query string
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub use clusteroperator_client::api;
pub use clusteroperator_client::client;
pub use clusteroperator_client::config;
pub use clusteroperator_client::error;

#[doc(inline)] pub use api::Api;
#[doc(inline)] pub use client::Client;
#[doc(inline)] pub use config::Config;
#[doc(inline)] pub use error::Error;

/// Convient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub use crate::core::{HasStatus, Resource, ResourceExt};
/// Re-exports from clusteroperator_core
pub use clusteroperator_core as core;

#[cfg(test)] mod mock_tests;
