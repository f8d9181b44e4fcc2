//! Error types for mesh-sequence-player

use std::path::PathBuf;
use thiserror::Error;

/// Main error type shared by the loader, the viewer and the encoder
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Window error: {0}")]
    Window(String),

    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("Visualization error: {0}")]
    Visualization(String),
}

impl Error {
    /// Build a parse error for `path`
    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Error::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for mesh-sequence-player operations
pub type Result<T> = std::result::Result<T, Error>;
