//! Error types for the snapshot capturer

use thiserror::Error;

/// Result type alias for capture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during snapshot capture
#[derive(Error, Debug)]
pub enum Error {
    /// The primary provider failed to render. Caught internally to trigger
    /// the fallback path; never surfaced to the caller on its own.
    #[error("Primary capture failed: {0}")]
    Primary(String),

    /// The fallback provider failed to render
    #[error("Fallback capture failed: {0}")]
    Secondary(String),

    /// Both providers failed; the message carries both underlying failures
    #[error("Failed to generate image: {0}")]
    Capture(String),

    /// Malformed base64 payload or malformed data URI
    #[error("Decode failed: {0}")]
    Decode(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}
