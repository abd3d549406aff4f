//! Error types for composing, fetching and probing

use thiserror::Error;

/// Result type alias for carimg operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing or checking car images
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Failed to lay out or draw a canvas
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to encode a canvas into its output format
    #[error("Encoding failed: {0}")]
    EncodeError(String),

    /// Network error (transport failure or unexpected status)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Operation timed out
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// Filesystem or report writer failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}

#[cfg(feature = "net")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::NetworkError(err.to_string())
    }
}
