//! Error types for the `FabBanana` studio application
//!
//! This module defines all error types used throughout the application,
//! providing clear error messages and proper error propagation.
//!
//! Error variants use `#[source]` to preserve error chains for better
//! observability and debugging.

use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Main error type for the `FabBanana` studio application
#[derive(Debug, Error)]
pub enum FabBananaError {
    /// Submission attempted with an empty or whitespace-only prompt
    #[error("prompt is empty")]
    EmptyPrompt,

    /// Submission attempted without the required primary image
    #[error("no primary image selected")]
    MissingPrimaryImage,

    /// Submission attempted without the required secondary image
    #[error("no secondary image selected")]
    MissingSecondaryImage,

    /// Batch submission attempted with an empty file list
    #[error("no files selected for batch processing")]
    NoBatchFiles,

    /// The server rejected the request with a non-success status
    #[error("server error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the server
        status: u16,
        /// Error message from the response body, or a generic status message
        message: String,
    },

    /// The HTTP request itself failed (connection, timeout, etc.)
    /// Preserves the underlying error source for full error chain transparency
    #[error("request failed: {0}")]
    RequestFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The response payload was not valid base64
    #[error("invalid image payload: {0}")]
    ImagePayload(#[from] base64::DecodeError),

    /// The decoded payload was not a displayable image
    #[error("image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Batch archive assembly failed
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Configuration error
    /// Preserves the underlying error source for full error chain transparency
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for `FabBanana` operations
pub type Result<T> = std::result::Result<T, FabBananaError>;

/// Convert an error to a user-friendly message
///
/// This function takes a `FabBananaError` and returns a message suitable
/// for displaying to end users in notices and error dialogs.
pub fn get_user_friendly_error(error: &FabBananaError) -> String {
    match error {
        FabBananaError::EmptyPrompt => "Please enter a prompt first.".to_string(),
        FabBananaError::MissingPrimaryImage => {
            "Please upload a main image for this mode first.".to_string()
        }
        FabBananaError::MissingSecondaryImage => {
            "Please upload a second image for this mode.".to_string()
        }
        FabBananaError::NoBatchFiles => {
            "Please select one or more images for batch processing.".to_string()
        }
        FabBananaError::Api { status, message } => {
            format!(
                "The server could not process the request (HTTP {status}):\n\n{message}"
            )
        }
        FabBananaError::RequestFailed(_) => "Could not reach the generation server.\n\n\
             Please check:\n\
             - The server address in your configuration\n\
             - Your network connection\n\
             - That the server is running"
            .to_string(),
        FabBananaError::ImagePayload(_) | FabBananaError::ImageDecode(_) => {
            "The server response did not contain a usable image.\n\n\
             This usually indicates a server-side problem.\n\
             Try the request again."
                .to_string()
        }
        FabBananaError::Archive(e) => {
            format!(
                "Failed to assemble the batch archive:\n\n{e}\n\n\
                 The processed images could not be bundled."
            )
        }
        FabBananaError::ConfigError(_) => "Failed to load or save configuration.\n\n\
             Your settings may not persist.\n\
             Check that you have write permissions to the FabBanana data directory."
            .to_string(),
        FabBananaError::IoError(e) => {
            format!(
                "A file system error occurred:\n\n{e}\n\n\
                 Please check file permissions and disk space."
            )
        }
        FabBananaError::JsonError(e) => {
            format!(
                "Unexpected data received:\n\n{e}\n\n\
                 The server response or configuration file is malformed."
            )
        }
    }
}
