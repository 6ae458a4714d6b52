//! Domain error types
//!
//! This module defines the error hierarchy for xdr-sweep.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main xdr-sweep error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// XDR API errors that escaped a page or alert boundary
    #[error("XDR API error: {0}")]
    Api(#[from] ApiError),

    /// Output file errors; these abort the run
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// XDR API errors
///
/// Errors that occur when talking to the alert API. These never carry
/// `reqwest` types so callers (and test stubs) can construct them freely.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request could not be built (bad URL, unserializable body)
    #[error("Request error: {0}")]
    Request(String),

    /// Connection-level failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The per-request deadline elapsed
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body could not be decoded
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether the failure happened below the HTTP layer
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Timeout(_))
    }

    /// Whether the server answered with a 5xx status
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if (500..600).contains(status))
    }

    /// HTTP status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for SweepError {
    fn from(err: std::io::Error) -> Self {
        SweepError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SweepError {
    fn from(err: serde_json::Error) -> Self {
        SweepError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SweepError {
    fn from(err: toml::de::Error) -> Self {
        SweepError::Configuration(format!("TOML parse error: {err}"))
    }
}
