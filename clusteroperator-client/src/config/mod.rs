//! Client configuration
//!
//! A [`Config`] holds the cluster url, the namespace handles default to,
//! and the connection timeouts used by the default http stack.
//! It is either constructed explicitly with [`Config::new`] or
//! inferred from the environment with [`Config::infer`].
use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable holding the url of the api server
pub const CLUSTER_URL_ENV: &str = "KUBERNETES_MASTER";
/// Environment variable overriding the default namespace
pub const NAMESPACE_ENV: &str = "KUBERNETES_NAMESPACE";

// Default timeout when watching.
// Using the same value as client-go so watches end just before the server times them out.
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(295);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration object detailing things like cluster url, default namespace and timeouts
///
/// This is the minimal set of information a [`Client`](crate::Client) needs to reach the api server.
#[derive(Debug, Clone)]
pub struct Config {
    /// The configured cluster url
    pub cluster_url: http::Uri,
    /// The configured default namespace
    pub default_namespace: String,
    /// Set the timeout for connecting to the api server.
    ///
    /// A value of `None` means no timeout
    pub connect_timeout: Option<Duration>,
    /// Set the timeout for the api server response.
    ///
    /// A value of `None` means no timeout
    pub read_timeout: Option<Duration>,
    /// Set the timeout for writing a request to the api server.
    ///
    /// A value of `None` means no timeout
    pub write_timeout: Option<Duration>,
}

impl Config {
    /// Construct a new config where only the `cluster_url` is set by the user.
    /// and everything else receives a default value.
    ///
    /// Most likely you want to use [`Config::infer`] to infer the config from
    /// the environment.
    pub fn new(cluster_url: http::Uri) -> Self {
        Self {
            cluster_url,
            default_namespace: String::from("default"),
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
            write_timeout: None,
        }
    }

    /// Infer the configuration from the environment
    ///
    /// Reads the cluster url from `KUBERNETES_MASTER` and an optional default
    /// namespace from `KUBERNETES_NAMESPACE`.
    pub fn infer() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup(CLUSTER_URL_ENV)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingClusterUrl { env: CLUSTER_URL_ENV })?;
        let cluster_url = url
            .parse::<http::Uri>()
            .map_err(|source| ConfigError::InvalidClusterUrl { url, source })?;
        let mut config = Self::new(cluster_url);
        if let Some(namespace) = lookup(NAMESPACE_ENV) {
            if namespace.is_empty() || namespace.contains('/') {
                return Err(ConfigError::InvalidNamespace {
                    env: NAMESPACE_ENV,
                    namespace,
                });
            }
            config.default_namespace = namespace;
        }
        tracing::debug!(cluster_url = %config.cluster_url, namespace = %config.default_namespace, "inferred config");
        Ok(config)
    }
}
