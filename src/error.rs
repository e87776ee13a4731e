//! Error types for pdfoutline library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while configuring or running outline extraction.
///
/// Document content never produces an error: malformed or empty input
/// degrades to an empty outline instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading configuration or fragment files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A configuration option is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
