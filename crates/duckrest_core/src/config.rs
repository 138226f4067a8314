//! Client configuration.
//!
//! `ClientConfig` carries the two values every request needs (base URL and
//! bearer token). `ClientOptions` holds the optional transport knobs.

use crate::error::{DuckRestError, Result};
use std::time::Duration;

/// Environment variable holding the server base URL.
pub const URL_ENV: &str = "DUCKREST_URL";

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "DUCKREST_TOKEN";

/// Server address and credentials, immutable after construction.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    auth_token: String,
}

impl ClientConfig {
    /// Create a configuration. Trailing slashes are stripped from `base_url`.
    ///
    /// The URL is not validated here; a malformed URL surfaces as a
    /// transport error on the first call.
    pub fn new(base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self { base_url: base_url.trim_end_matches('/').to_string(), auth_token: auth_token.into() }
    }

    /// Create a configuration from `DUCKREST_URL` and `DUCKREST_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(URL_ENV)
            .map_err(|_| DuckRestError::config(format!("{URL_ENV} environment variable not set")))?;
        let auth_token = std::env::var(TOKEN_ENV).map_err(|_| {
            DuckRestError::config(format!("{TOKEN_ENV} environment variable not set"))
        })?;
        Ok(Self::new(base_url, auth_token))
    }

    /// Base URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Bearer token sent with every request.
    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

/// How `get_schema` places the table name into the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaPathEncoding {
    /// Percent-encode the table name as a single path segment.
    #[default]
    Percent,
    /// Interpolate the table name verbatim.
    ///
    /// Some deployments expect unescaped names on the wire. A name
    /// containing `/`, `?` or `#` then addresses a different resource, so
    /// only use this with trusted table names.
    Raw,
}

/// Optional transport settings.
///
/// Defaults apply no timeout. Connection-level settings (pooling, proxies,
/// connect timeouts) belong to a caller-built `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Total per-request timeout.
    pub timeout: Option<Duration>,
    /// Table name handling for schema lookups.
    pub schema_path_encoding: SchemaPathEncoding,
}

impl ClientOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the schema path encoding.
    pub fn with_schema_path_encoding(mut self, encoding: SchemaPathEncoding) -> Self {
        self.schema_path_encoding = encoding;
        self
    }
}
