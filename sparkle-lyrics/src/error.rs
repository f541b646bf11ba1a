//! Error types for sparkle-lyrics

use thiserror::Error;

/// Main error type for lyrics reading, writing and lookup
#[derive(Debug, Error)]
pub enum LyricsError {
    /// File I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No reader/writer registered for the extension
    #[error("Unsupported lyrics format: {0}")]
    UnsupportedFormat(String),

    /// File structure could not be understood
    #[error("Malformed {format} lyrics: {reason}")]
    Malformed { format: &'static str, reason: String },

    /// Base64 payload could not be decoded
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Extra lyrics JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// zlib stream errors
    #[error("Compression error: {0}")]
    Compression(String),

    /// Audio tag / property extraction errors
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// sparkle-common error
    #[error("Common error: {0}")]
    Common(#[from] sparkle_common::Error),
}

impl LyricsError {
    pub(crate) fn malformed(format: &'static str, reason: impl Into<String>) -> Self {
        LyricsError::Malformed {
            format,
            reason: reason.into(),
        }
    }
}

/// Convenience Result type using LyricsError
pub type Result<T> = std::result::Result<T, LyricsError>;
