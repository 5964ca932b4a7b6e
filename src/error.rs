use thiserror::Error;

use crate::models::AssetSlot;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A selected file could not be read into an upload. Scoped to one slot.
    #[error("{}: {message}", .slot.read_failure_message())]
    AssetRead { slot: AssetSlot, message: String },

    #[error("Please upload an image first.")]
    MissingSubject,

    #[error("Request error: {0}")]
    Request(String),

    #[error("Response error: {0}")]
    Response(String),

    /// Every requested output shape came back without an image.
    #[error("Failed to generate thumbnail. The model may be unavailable. Please try again later.")]
    GenerationFailed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ThumbnailError {
    /// Message suitable for the presentation layer's error banner.
    pub fn user_message(&self) -> String {
        match self {
            ThumbnailError::AssetRead { slot, .. } => slot.read_failure_message().to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ThumbnailError>;
