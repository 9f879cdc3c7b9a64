//! Error types for the HTML front end.

use thiserror::Error;

/// Result type for HTML conversion
pub type Result<T> = std::result::Result<T, HtmlError>;

/// Errors that can occur while turning HTML into slides
#[derive(Error, Debug)]
pub enum HtmlError {
    /// Options file could not be parsed
    #[error("Invalid options in '{source_name}': {reason}")]
    InvalidOptions { source_name: String, reason: String },

    /// Image source that could not be resolved to bytes
    #[error("Image source '{src}' unavailable: {reason}")]
    ImageSource { src: String, reason: String },

    /// Error from the PPTX layer
    #[error(transparent)]
    Pptx(#[from] slidekit_pptx::PptxError),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP error while downloading a remote image
    #[cfg(feature = "remote-images")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HtmlError {
    /// Create an invalid options error
    pub fn invalid_options(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOptions {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Create an image source error
    pub fn image_source(src: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ImageSource {
            src: src.into(),
            reason: reason.into(),
        }
    }

    /// Get the error code for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidOptions { .. } => "HTML001",
            Self::ImageSource { .. } => "HTML002",
            Self::Pptx(_) => "HTML003",
            Self::Toml(_) => "HTML004",
            #[cfg(feature = "remote-images")]
            Self::Http(_) => "HTML005",
            Self::Io(_) => "HTML006",
        }
    }
}
