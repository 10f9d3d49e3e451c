//! Backend configuration for the MCP bridge
//!
//! The bridge talks to a single fixed backend origin. The only value taken
//! from the environment is the API key; everything is read once at startup
//! and shared read-only for the lifetime of the process.

use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Fixed backend origin
pub const BACKEND_URL: &str = "https://backend.agiverse.io";

/// Environment variable holding the backend API key
pub const API_KEY_ENV: &str = "AGIVERSE_API_KEY";

/// Total time budget for an action search request
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Total time budget for an action call request
pub const CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Process-wide backend configuration
#[derive(Clone, PartialEq)]
pub struct BackendConfig {
    /// Backend origin, e.g. `https://backend.agiverse.io`
    pub origin: String,
    /// API key attached to action calls; `None` when unset
    pub api_key: Option<String>,
    pub search_timeout: Duration,
    pub call_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            origin: BACKEND_URL.to_string(),
            api_key: None,
            search_timeout: SEARCH_TIMEOUT,
            call_timeout: CALL_TIMEOUT,
        }
    }
}

// Never print the key itself.
impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("origin", &self.origin)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("search_timeout", &self.search_timeout)
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid backend origin '{origin}': {source}")]
    InvalidOrigin {
        origin: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BackendConfig {
    /// Build a configuration for the fixed origin. An empty key counts as absent.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            ..Default::default()
        }
    }

    /// Read the API key from `AGIVERSE_API_KEY`
    pub fn from_env() -> Self {
        Self::from_env_var(API_KEY_ENV)
    }

    /// Read the API key from the named environment variable
    pub fn from_env_var(name: &str) -> Self {
        Self::new(std::env::var(name).ok())
    }

    /// Point the configuration at another origin (used by tests and local backends)
    pub fn with_origin<S: Into<String>>(mut self, origin: S) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn with_timeouts(mut self, search_timeout: Duration, call_timeout: Duration) -> Self {
        self.search_timeout = search_timeout;
        self.call_timeout = call_timeout;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let origin = self.origin_url()?;
        if !matches!(origin.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidConfig(format!(
                "backend origin must use http or https, got '{}'",
                origin.scheme()
            )));
        }
        if self.search_timeout.is_zero() || self.call_timeout.is_zero() {
            return Err(ConfigError::InvalidConfig(
                "backend timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Absolute URL of a backend API path
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        Url::parse(&self.origin)?.join(path)
    }

    fn origin_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.origin).map_err(|source| ConfigError::InvalidOrigin {
            origin: self.origin.clone(),
            source,
        })
    }
}
