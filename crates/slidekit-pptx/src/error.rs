//! Error types for PPTX generation.

use thiserror::Error;

/// Result type for PPTX operations
pub type Result<T> = std::result::Result<T, PptxError>;

/// Errors that can occur during PPTX generation
#[derive(Error, Debug)]
pub enum PptxError {
    /// Color literal that does not normalize to six hex digits
    #[error("Invalid color '{value}': {reason}")]
    InvalidColor { value: String, reason: String },

    /// Media file could not be read or classified
    #[error("Media error for '{path}': {reason}")]
    MediaError { path: String, reason: String },

    /// Slide index outside the presentation
    #[error("Slide index {index} out of range (presentation has {count} slides)")]
    SlideOutOfRange { index: usize, count: usize },

    /// Model state that cannot be serialized
    #[error("Invalid model: {reason}")]
    InvalidModel { reason: String },

    /// ZIP archive error
    #[error("Archive error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PptxError {
    /// Create an invalid color error
    pub fn invalid_color(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidColor {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a media error
    pub fn media_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MediaError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid model error
    pub fn invalid_model(reason: impl Into<String>) -> Self {
        Self::InvalidModel {
            reason: reason.into(),
        }
    }

    /// Get the error code for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidColor { .. } => "PPTX001",
            Self::MediaError { .. } => "PPTX002",
            Self::SlideOutOfRange { .. } => "PPTX003",
            Self::InvalidModel { .. } => "PPTX004",
            Self::ZipError(_) => "PPTX005",
            Self::IoError(_) => "PPTX006",
        }
    }
}
