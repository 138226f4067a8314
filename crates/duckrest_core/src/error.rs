//! Error types for the duckrest client.
//!
//! Every client operation fails with exactly one of three categories:
//! - **Transport**: no response was obtained (connect, DNS, TLS, timeout, bad URL)
//! - **Server**: a response arrived with an HTTP failure status (4xx/5xx)
//! - **Decode**: a success response whose body did not have the expected shape
//!
//! `Config` is raised only while loading configuration, never by a client call.

use thiserror::Error;

/// Main error type for duckrest.
#[derive(Debug, Error)]
pub enum DuckRestError {
    /// The request could not be sent or no response was received.
    #[error("Transport error: {message}")]
    Transport {
        /// Human-readable error message.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The server answered with a failure status.
    #[error("Server error (HTTP {status}): {}", .message.as_deref().unwrap_or("no error message"))]
    Server {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body, if any.
        message: Option<String>,
    },

    /// A success response did not match the expected shape for its endpoint.
    #[error("Decode error on /{endpoint}: {message}")]
    Decode {
        /// Endpoint name the response came from.
        endpoint: String,
        /// What was wrong with the body.
        message: String,
        /// Offending field, when a single field is at fault.
        field: Option<String>,
    },

    /// Configuration error (missing environment variables, invalid values).
    #[error("Config error: {message}")]
    Config {
        /// Human-readable error message.
        message: String,
    },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DuckRestError>;

impl DuckRestError {
    // ========== Constructors ==========

    /// Create a new transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into(), source: None }
    }

    /// Create a new transport error with source.
    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport { message: message.into(), source: Some(Box::new(source)) }
    }

    /// Create a new server error.
    pub fn server(status: u16, message: Option<String>) -> Self {
        Self::Server { status, message }
    }

    /// Create a decode error that is not tied to a single field.
    pub fn decode(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode { endpoint: endpoint.into(), message: message.into(), field: None }
    }

    /// Create a decode error for a missing or malformed field.
    pub fn decode_field(
        endpoint: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Decode { endpoint: endpoint.into(), message: message.into(), field: Some(field.into()) }
    }

    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    // ========== Methods ==========

    /// Check if no response was obtained.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if the server answered with a failure status.
    pub fn is_server(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// Check if a success body could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// HTTP status code (server errors only).
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Offending field (decode errors only).
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Decode { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Whether a caller-side retry could plausibly succeed.
    ///
    /// The client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Server { status, .. } => *status >= 500 || *status == 429 || *status == 408,
            Self::Decode { .. } | Self::Config { .. } => false,
        }
    }

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "Transport",
            Self::Server { .. } => "Server",
            Self::Decode { .. } => "Decode",
            Self::Config { .. } => "Config",
        }
    }

    /// Get actionable hint for the user.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Transport { .. } => {
                Some("Check that the base URL is correct and the server is reachable")
            }
            Self::Server { status: 401 | 403, .. } => Some("Check that the API token is valid"),
            Self::Server { status: 404, .. } => Some("Check the table name or server version"),
            Self::Server { status, .. } if *status >= 500 => {
                Some("The server failed to process the request; check the SQL and server logs")
            }
            Self::Server { .. } => None,
            Self::Decode { .. } => Some("The server response did not have the expected shape"),
            Self::Config { .. } => Some("Set DUCKREST_URL and DUCKREST_TOKEN or pass them as flags"),
        }
    }

    /// Convert to user-displayable error info.
    pub fn to_error_info(&self) -> ErrorInfo {
        let error_type = format!("{} Error", self.category());
        let message = self.to_string();
        let hint = self.hint().map(String::from);

        let technical_detail = match self {
            Self::Server { status, .. } => Some(format!("Status: {status}")),
            Self::Decode { endpoint, field, .. } => {
                let mut parts = vec![format!("Endpoint: /{endpoint}")];
                if let Some(field) = field {
                    parts.push(format!("Field: {field}"));
                }
                Some(parts.join("\n"))
            }
            Self::Transport { source: Some(source), .. } => Some(source.to_string()),
            _ => None,
        };

        ErrorInfo { error_type, message, hint, technical_detail }
    }
}

/// User-displayable error information.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ErrorInfo {
    /// Category name (e.g., "Server Error").
    pub error_type: String,
    /// User-friendly message.
    pub message: String,
    /// Actionable suggestion.
    pub hint: Option<String>,
    /// Technical detail (status code, offending field, underlying cause).
    pub technical_detail: Option<String>,
}

// ========== Error Conversions ==========

/// Convert from reqwest::Error to DuckRestError.
///
/// Only failures that happen before a response exists reach this conversion;
/// status and body handling is done explicitly by the client.
impl From<reqwest::Error> for DuckRestError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request timed out".to_string()
        } else if err.is_connect() {
            "Failed to connect to server".to_string()
        } else if err.is_builder() {
            "Failed to build request (invalid URL or header)".to_string()
        } else {
            "Request failed".to_string()
        };
        DuckRestError::Transport { message, source: Some(Box::new(err)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display_includes_status_and_message() {
        let err = DuckRestError::server(400, Some("Parser Error: syntax error".to_string()));
        assert_eq!(err.to_string(), "Server error (HTTP 400): Parser Error: syntax error");
        assert_eq!(err.status(), Some(400));

        let err = DuckRestError::server(502, None);
        assert_eq!(err.to_string(), "Server error (HTTP 502): no error message");
    }

    #[test]
    fn test_categories_are_distinct() {
        assert_eq!(DuckRestError::transport("x").category(), "Transport");
        assert_eq!(DuckRestError::server(500, None).category(), "Server");
        assert_eq!(DuckRestError::decode("query", "x").category(), "Decode");
        assert_eq!(DuckRestError::config("x").category(), "Config");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(DuckRestError::transport("refused").is_retryable());
        assert!(DuckRestError::server(503, None).is_retryable());
        assert!(DuckRestError::server(429, None).is_retryable());
        assert!(!DuckRestError::server(400, None).is_retryable());
        assert!(!DuckRestError::server(401, None).is_retryable());
        assert!(!DuckRestError::decode("tables", "missing").is_retryable());
    }

    #[test]
    fn test_auth_failure_hint_mentions_token() {
        let info = DuckRestError::server(401, Some("Invalid token".into())).to_error_info();
        assert_eq!(info.error_type, "Server Error");
        assert!(info.hint.as_ref().unwrap().contains("token"));
        assert_eq!(info.technical_detail.as_deref(), Some("Status: 401"));
    }

    #[test]
    fn test_decode_error_info_names_field() {
        let err = DuckRestError::decode_field("tables", "tables", "missing field");
        assert_eq!(err.field(), Some("tables"));

        let info = err.to_error_info();
        let detail = info.technical_detail.unwrap();
        assert!(detail.contains("Endpoint: /tables"));
        assert!(detail.contains("Field: tables"));
    }
}
