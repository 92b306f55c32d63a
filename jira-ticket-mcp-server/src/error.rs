//! Error types and handling for the JIRA ticket MCP server
//!
//! Provides structured error types that map to MCP JSON-RPC error codes.
//! `Api` is the single error raised by the HTTP client; its message is
//! already user-facing and is returned to MCP clients verbatim.

use serde_json::Value;
use thiserror::Error;

/// Custom error types for the JIRA ticket MCP server
#[derive(Debug, Error)]
pub enum JiraMcpError {
    /// Configuration errors (-32001)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Failures talking to the JIRA REST API
    ///
    /// `status_code` is `None` when no HTTP response was received. The
    /// transport error is kept in `source` for diagnostics only and never
    /// shows up in `Display`.
    #[error("{message}")]
    Api {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Invalid parameter errors (-32006)
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Internal server errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl JiraMcpError {
    /// Get the MCP JSON-RPC error code for this error
    pub fn error_code(&self) -> i32 {
        match self {
            JiraMcpError::Configuration { .. } => -32001,
            JiraMcpError::Api { status_code, .. } => match status_code {
                Some(401) => -32002,
                None => -32003,
                Some(403) => -32004,
                Some(404) => -32005,
                Some(429) => -32007,
                Some(_) => -32008,
            },
            JiraMcpError::InvalidParameter { .. } => -32006,
            JiraMcpError::Internal { .. } => -32603,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            JiraMcpError::Configuration { .. } => "configuration",
            JiraMcpError::Api { status_code, .. } => match status_code {
                Some(401) => "authentication",
                Some(403) => "permission",
                Some(404) => "not_found",
                Some(429) => "rate_limit",
                Some(500 | 502 | 503) => "unavailable",
                Some(_) => "api",
                None => "network",
            },
            JiraMcpError::InvalidParameter { .. } => "invalid_parameter",
            JiraMcpError::Internal { .. } => "internal",
        }
    }

    /// Whether repeating the same request could succeed.
    ///
    /// Nothing in this crate retries; the flag is exposed for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            JiraMcpError::Api { status_code, .. } => match status_code {
                Some(code) => *code == 429 || (500..600).contains(code),
                None => true,
            },
            _ => false,
        }
    }

    /// Get additional error data for MCP error responses
    pub fn error_data(&self) -> Option<Value> {
        let mut data = serde_json::Map::new();
        data.insert(
            "category".to_string(),
            Value::String(self.category().to_string()),
        );

        match self {
            JiraMcpError::Api {
                status_code: Some(code),
                ..
            } => {
                data.insert("status_code".to_string(), Value::Number((*code).into()));
            }
            JiraMcpError::InvalidParameter { parameter, .. } => {
                data.insert("parameter".to_string(), Value::String(parameter.clone()));
            }
            _ => {}
        }

        Some(Value::Object(data))
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        JiraMcpError::Configuration {
            message: message.into(),
        }
    }

    /// Create an API error for an HTTP response
    pub fn api(message: impl Into<String>, status_code: u16) -> Self {
        JiraMcpError::Api {
            message: message.into(),
            status_code: Some(status_code),
            source: None,
        }
    }

    /// Create an API error for a request that never got a response
    pub fn connectivity(message: impl Into<String>, source: reqwest::Error) -> Self {
        JiraMcpError::Api {
            message: message.into(),
            status_code: None,
            source: Some(source),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_param(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        JiraMcpError::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        JiraMcpError::Internal {
            message: message.into(),
        }
    }

    /// HTTP status attached to an API error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            JiraMcpError::Api { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

/// Result type alias for JIRA MCP operations
pub type JiraMcpResult<T> = Result<T, JiraMcpError>;
