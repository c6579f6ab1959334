//! Error types for the Keysign core library.

use std::path::PathBuf;

use thiserror::Error;

/// Core error type for signing configuration resolution.
#[derive(Error, Debug)]
pub enum SigningError {
    /// The properties file exists but could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required key was absent or blank.
    #[error("Missing required signing field: {0}")]
    MissingRequiredField(&'static str),

    /// A path that can't be written to key.properties without changing it.
    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("Android directory not found: {}", .0.display())]
    AndroidDirNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Keysign operations.
pub type Result<T> = std::result::Result<T, SigningError>;
