//! Crate with types and traits necessary for interacting with cluster operator resources
//!
//! This crate is available as a minimal alternative to `clusteroperator` where a client is not available.
//! The same information here is always re-exported from `clusteroperator` under `clusteroperator::core`.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod codec;
pub use codec::{ParameterCodec, QueryParameterCodec};

pub mod machineset;
pub use machineset::{MachineSet, MachineSetList, MachineSetSpec, MachineSetStatus};

pub mod metadata;

pub mod object;
pub use object::ObjectList;

pub mod params;

pub mod request;
pub use request::Request;

mod resource;
pub use resource::{HasStatus, NamespaceResourceScope, Resource, ResourceExt, ResourceScope};

pub mod watch;
pub use watch::WatchEvent;

mod error;
pub use error::{Error, ErrorResponse, StatusCause, StatusDetails};

/// Convient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;
