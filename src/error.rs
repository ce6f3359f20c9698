//! Error types for the Helix client
//!
//! Transport failures are not part of this enum. They are
//! carried inside an [`Envelope`](crate::envelope::Envelope) and read through
//! `error_message()`. Everything here is either a caller mistake caught
//! before dispatch or an ambient failure (config, I/O, typed decoding).

use thiserror::Error;

/// The main error type for the Helix client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Request Errors
    // ============================================================================
    #[error("Missing required parameter for '{endpoint}': expected one of {expected}")]
    MissingParameter { endpoint: String, expected: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("Unknown rate limit key: {key}")]
    UnknownRateLimitKey { key: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing parameter error
    pub fn missing_parameter(endpoint: impl Into<String>, expected: &[&str]) -> Self {
        Self::MissingParameter {
            endpoint: endpoint.into(),
            expected: expected.join(", "),
        }
    }

    /// Create an unknown rate limit key error
    pub fn unknown_rate_limit_key(key: impl Into<String>) -> Self {
        Self::UnknownRateLimitKey { key: key.into() }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Result type alias for the Helix client
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
