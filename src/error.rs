//! Error types for the stegano client.

use crate::operation::OperationKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for stegano client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside the operation lifecycle.
///
/// Failures of an embed or extract request are not errors: they end up as a
/// [`FailureReason`](crate::operation::FailureReason) on a failed operation.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading a selection or writing a download.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The remote call did not complete.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A submission of this kind is still waiting for its response.
    #[error("{0} operation already in flight")]
    OperationInFlight(OperationKind),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A selected path has no usable file name.
    #[error("Invalid file name: {0}")]
    InvalidFilename(PathBuf),

    /// Image metadata could not be decoded.
    #[error("Image decode error: {0}")]
    Image(String),

    /// Profile update rejected.
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}
