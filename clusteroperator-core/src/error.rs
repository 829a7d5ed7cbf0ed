use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Possible errors when building a request
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to build a request because of a malformed or repeated part
    #[error("failed to build request: {0}")]
    Validation(String),

    /// Failed to encode query parameters through the parameter codec
    #[error("failed to encode parameters: {0}")]
    Codec(String),

    /// Failed to serialize a body or a parameter object
    #[error("failed to serialize: {0}")]
    SerdeJson(#[source] serde_json::Error),

    /// Failed to assemble the http request
    #[error("failed to build http request: {0}")]
    Http(#[source] http::Error),
}

/// An error response from the API.
///
/// This is the `Status` payload the server sends along with a failing http status code.
#[derive(Error, Deserialize, Serialize, Debug, Clone, Eq, PartialEq)]
#[error("{message}: {reason}")]
pub struct ErrorResponse {
    /// The status
    pub status: String,
    /// A message about the error
    #[serde(default)]
    pub message: String,
    /// The reason for the error
    #[serde(default)]
    pub reason: String,
    /// The error code
    pub code: u16,
    /// Extended data associated with the reason.
    /// Each reason may define its own extended details.
    #[serde(default)]
    pub details: Option<StatusDetails>,
}

/// StatusDetails is a set of additional properties that MAY be set by the server
/// to provide additional information about a response.
/// The Reason field of a Status object defines what attributes will be set.
/// Clients must ignore fields that do not match the defined type of each attribute,
/// and should assume that any attribute may be empty, invalid, or under defined.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDetails {
    /// The Causes array includes more details associated with the StatusReason failure.
    /// Not all StatusReasons may provide detailed causes.
    pub causes: Option<Vec<StatusCause>>,

    /// The group attribute of the resource associated with the status StatusReason.
    pub group: Option<String>,

    /// The kind attribute of the resource associated with the status StatusReason.
    /// On some operations may differ from the requested resource Kind.
    pub kind: Option<String>,

    /// The name attribute of the resource associated with the status StatusReason
    /// (when there is a single name which can be described).
    pub name: Option<String>,

    /// If specified, the time in seconds before the operation should be retried.
    pub retry_after_seconds: Option<i32>,

    /// UID of the resource. (when there is a single resource which can be described).
    pub uid: Option<String>,
}

/// StatusCause provides more information about an api.Status failure,
/// including cases when multiple errors are encountered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCause {
    /// The field of the resource that has caused this error, as named by its JSON serialization.
    /// May include dot and postfix notation for nested attributes. Arrays are zero-indexed.
    ///
    /// Examples:
    ///   "name" - the field "name" on the current resource
    ///   "items\[0\].name" - the field "name" on the first array entry in "items"
    pub field: Option<String>,

    /// A human-readable description of the cause of the error.
    pub message: Option<String>,

    /// A machine-readable description of the cause of the error.
    pub reason: Option<String>,
}
