//! A port of the option objects from apimachinery's meta/v1 types
//!
//! Every option type derives [`Serialize`]; query options travel through a
//! [`ParameterCodec`](crate::codec::ParameterCodec) and [`DeleteOptions`] travels as a json body.
use crate::Error;
use serde::Serialize;
use std::str::FromStr;

/// Controls how the resource version parameter is applied for list calls
///
/// See <https://kubernetes.io/docs/reference/using-api/api-concepts/#semantics-for-get-and-list> for details.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum VersionMatch {
    /// Returns data at least as new as the provided resource version.
    NotOlderThan,

    /// Return data at the exact resource version provided.
    ///
    /// If the provided resource version is unavailable, the server responds with HTTP 410 "Gone".
    Exact,
}

/// Query options used in list, watch and delete collection calls
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOptions {
    /// A selector to restrict the list of returned objects by their labels.
    ///
    /// Defaults to everything if `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_selector: Option<String>,

    /// A selector to restrict the list of returned objects by their fields.
    ///
    /// Defaults to everything if `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_selector: Option<String>,

    /// Watch for changes to the described resources instead of listing them.
    ///
    /// Always forced on by watch calls.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub watch: bool,

    /// Request watch events with type "BOOKMARK".
    ///
    /// Servers that do not implement bookmarks ignore this flag.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub allow_watch_bookmarks: bool,

    /// An explicit resourceVersion, interpreted according to `resource_version_match`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,

    /// Determines how `resource_version` is applied to list calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version_match: Option<VersionMatch>,

    /// Timeout for the list/watch call.
    ///
    /// This limits the duration of the call, regardless of any activity or inactivity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u32>,

    /// Limit the number of results.
    ///
    /// If there are more results, the server will respond with a continue token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Fetch a further page of results.
    #[serde(rename = "continue", skip_serializing_if = "Option::is_none")]
    pub continue_token: Option<String>,
}

/// Builder interface to ListOptions
///
/// Usage:
/// ```
/// use clusteroperator_core::params::ListOptions;
/// let lo = ListOptions::default()
///     .timeout(60)
///     .labels("clusteroperator.openshift.io/cluster=prod");
/// ```
impl ListOptions {
    /// Configure the timeout for list/watch calls
    #[must_use]
    pub fn timeout(mut self, timeout_secs: u32) -> Self {
        self.timeout_seconds = Some(timeout_secs);
        self
    }

    /// Configure the selector to restrict the list of returned objects by their fields.
    ///
    /// Supports `=`, `==`, `!=`, and can be comma separated: `key1=value1,key2=value2`.
    #[must_use]
    pub fn fields(mut self, field_selector: &str) -> Self {
        self.field_selector = Some(field_selector.to_string());
        self
    }

    /// Configure the selector to restrict the list of returned objects by their labels.
    ///
    /// Supports `=`, `==`, `!=`, and can be comma separated: `key1=value1,key2=value2`.
    #[must_use]
    pub fn labels(mut self, label_selector: &str) -> Self {
        self.label_selector = Some(label_selector.to_string());
        self
    }

    /// Sets a result limit.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets a continue token.
    #[must_use]
    pub fn continue_token(mut self, token: &str) -> Self {
        self.continue_token = Some(token.to_string());
        self
    }

    /// Sets the resource version
    #[must_use]
    pub fn at(mut self, resource_version: &str) -> Self {
        self.resource_version = Some(resource_version.into());
        self
    }

    /// Sets a resource version match strategy
    #[must_use]
    pub fn matching(mut self, version_match: VersionMatch) -> Self {
        self.resource_version_match = Some(version_match);
        self
    }

    /// Ask for bookmark events on watches
    #[must_use]
    pub fn bookmarks(mut self) -> Self {
        self.allow_watch_bookmarks = true;
        self
    }
}

/// Query options used in get calls
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetOptions {
    /// An explicit resourceVersion with implicit version matching strategies
    ///
    /// Default (unset) gives the most recent version. "0" gives a less
    /// consistent, but more performant "Any" version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

impl GetOptions {
    /// Sets the resource version, implicitly applying a 'NotOlderThan' match
    #[must_use]
    pub fn at(resource_version: &str) -> Self {
        Self {
            resource_version: Some(resource_version.into()),
        }
    }

    /// Sets the resource version to "0"
    #[must_use]
    pub fn any() -> Self {
        Self::at("0")
    }
}

/// The encoding of a raw patch body
///
/// See [kubernetes patch docs](https://kubernetes.io/docs/tasks/manage-kubernetes-objects/update-api-object-kubectl-patch/).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchType {
    /// [JSON patch](https://tools.ietf.org/html/rfc6902)
    Json,
    /// [JSON Merge patch](https://tools.ietf.org/html/rfc7386)
    Merge,
    /// Strategic JSON Merge patch
    StrategicMerge,
    /// Server side apply
    Apply,
}

impl PatchType {
    /// The `Content-Type` the server dispatches on
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json-patch+json",
            Self::Merge => "application/merge-patch+json",
            Self::StrategicMerge => "application/strategic-merge-patch+json",
            Self::Apply => "application/apply-patch+yaml",
        }
    }
}

impl FromStr for PatchType {
    type Err = Error;

    /// Parses a patch content type
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "application/json-patch+json" => Ok(Self::Json),
            "application/merge-patch+json" => Ok(Self::Merge),
            "application/strategic-merge-patch+json" => Ok(Self::StrategicMerge),
            "application/apply-patch+yaml" => Ok(Self::Apply),
            other => Err(Error::Validation(format!("unknown patch type {other:?}"))),
        }
    }
}

/// Options for delete calls, sent as the request body
#[derive(Default, Clone, Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOptions {
    /// When present, indicates that modifications should not be persisted.
    #[serde(serialize_with = "dry_run_all_ser", skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,

    /// The duration in seconds before the object should be deleted.
    ///
    /// The value zero indicates delete immediately.
    /// If this value is `None`, the default grace period for the specified type will be used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grace_period_seconds: Option<u32>,

    /// Whether or how garbage collection is performed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub propagation_policy: Option<PropagationPolicy>,

    /// Conditions that must be fulfilled before a deletion is carried out
    ///
    /// If not possible, a `409 Conflict` status will be returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preconditions: Option<Preconditions>,
}

impl DeleteOptions {
    /// Construct `DeleteOptions` with `PropagationPolicy::Background`.
    pub fn background() -> Self {
        Self {
            propagation_policy: Some(PropagationPolicy::Background),
            ..Self::default()
        }
    }

    /// Construct `DeleteOptions` with `PropagationPolicy::Foreground`.
    pub fn foreground() -> Self {
        Self {
            propagation_policy: Some(PropagationPolicy::Foreground),
            ..Self::default()
        }
    }

    /// Construct `DeleteOptions` with `PropagationPolicy::Orphan`.
    pub fn orphan() -> Self {
        Self {
            propagation_policy: Some(PropagationPolicy::Orphan),
            ..Self::default()
        }
    }

    /// Perform a dryRun only
    #[must_use]
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Set the duration in seconds before the object should be deleted.
    #[must_use]
    pub fn grace_period(mut self, secs: u32) -> Self {
        self.grace_period_seconds = Some(secs);
        self
    }

    /// Set the conditions that must be fulfilled before a deletion is carried out.
    #[must_use]
    pub fn preconditions(mut self, preconditions: Preconditions) -> Self {
        self.preconditions = Some(preconditions);
        self
    }
}

// dryRun is a list in body parameters: either missing, or ["All"].
fn dry_run_all_ser<S>(t: &bool, s: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::ser::Serializer,
{
    use serde::ser::SerializeTuple;
    match t {
        true => {
            let mut map = s.serialize_tuple(1)?;
            map.serialize_element("All")?;
            map.end()
        }
        false => s.serialize_none(),
    }
}

/// Preconditions must be fulfilled before an operation (update, delete, etc.) is carried out.
#[derive(Default, Clone, Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preconditions {
    /// Specifies the target ResourceVersion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    /// Specifies the target UID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

/// Propagation policy when deleting single objects
#[derive(Clone, Debug, Serialize, PartialEq)]
pub enum PropagationPolicy {
    /// Orphan dependents
    Orphan,
    /// Allow the garbage collector to delete the dependents in the background
    Background,
    /// A cascading policy that deletes all dependents in the foreground
    Foreground,
}
