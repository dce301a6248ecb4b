use std::path::PathBuf;

use thiserror::Error;

/// Error type for key lifecycle operations
#[derive(Error, Debug)]
pub enum Error {
    /// Profile constraints not met
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("Import failed: {0}")]
    ImportFailed(String),

    #[error("IO error at {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Verification could not be carried out (as opposed to a mismatch)
    #[error("Verification error: {0}")]
    VerificationError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::IoError {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::EncodingError(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
