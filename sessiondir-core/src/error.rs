//! Error types for sessiondir.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in sessiondir operations.
#[derive(Error, Debug)]
pub enum SessionDirError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API request failed: {0}")]
    Fetch(String),

    #[error("API request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("Failed to parse API response: {0}")]
    InvalidResponse(String),

    #[error("Malformed JSON in {}: {message}", path.display())]
    MalformedFile { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for sessiondir operations.
pub type SessionDirResult<T> = Result<T, SessionDirError>;
