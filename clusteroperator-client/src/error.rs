//! Error handling in [`clusteroperator_client`][crate]
use http::StatusCode;
use thiserror::Error;

pub use clusteroperator_core::ErrorResponse;

/// Possible errors when working with [`clusteroperator_client`][crate]
#[derive(Error, Debug)]
pub enum Error {
    /// ApiError for when things fail
    ///
    /// This can be parsed into as an error handling fallback.
    /// It's also used in `WatchEvent` from watch calls.
    ///
    /// A `404 NotFound` is reported through this variant like any other status.
    #[error("ApiError: {0} ({0:?})")]
    Api(#[source] ErrorResponse),

    /// Service error
    #[error("ServiceError: {0}")]
    Service(#[source] tower::BoxError),

    /// UTF-8 Error
    #[error("UTF-8 Error: {0}")]
    FromUtf8(#[source] std::string::FromUtf8Error),

    /// Returned when failed to find a newline character within max length.
    /// Only returned by `Client::request_events` and this should never happen as
    /// the max is `usize::MAX`.
    #[error("Error finding newline character")]
    LinesCodecMaxLineLengthExceeded,

    /// Returned on `std::io::Error` when reading event stream.
    #[error("Error reading events stream: {0}")]
    ReadEvents(#[source] std::io::Error),

    /// Common error case when requesting parsing into own structs
    #[error("Error deserializing response: {0}")]
    SerdeError(#[source] serde_json::Error),

    /// Failed to build request
    #[error("Failed to build request: {0}")]
    BuildRequest(#[source] clusteroperator_core::Error),

    /// Configuration error
    #[error("Error inferring config: {0}")]
    InferConfig(#[source] ConfigError),

    /// The cluster url uses https but no tls stack is available
    #[error("TLS required but no TLS stack selected")]
    TlsRequired,
}

impl Error {
    /// Whether the request failed before the server produced a status
    ///
    /// Connection failures, timeouts and broken response bodies land here.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Service(_) | Error::ReadEvents(_) | Error::LinesCodecMaxLineLengthExceeded
        )
    }

    /// Whether a response arrived but could not be decoded
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::SerdeError(_) | Error::FromUtf8(_))
    }

    /// The http status reported by the server, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api(ae) => StatusCode::from_u16(ae.code).ok(),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
// Redundant with the error messages and machine names
#[allow(missing_docs)]
/// Possible errors when loading config
pub enum ConfigError {
    #[error("Unable to infer config, {env} must be defined")]
    MissingClusterUrl { env: &'static str },

    #[error("Invalid cluster url {url:?}: {source}")]
    InvalidClusterUrl {
        url: String,
        #[source]
        source: http::uri::InvalidUri,
    },

    #[error("Invalid default namespace from {env}: {namespace:?}")]
    InvalidNamespace { env: &'static str, namespace: String },
}
