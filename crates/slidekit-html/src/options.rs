//! Conversion options.
//!
//! Options can be built in code or loaded from TOML; every field is optional
//! in the file and falls back to [`HtmlOptions::default`].
//!
//! ```toml
//! body_font_size = 16.0
//! heading_color = "#004080"
//! slide_background = "#FAFAFA"
//! auto_scale = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HtmlError, Result};

/// Fonts, colors and fitting policy for HTML conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlOptions {
    /// Slide title (`<h1>`) size in points
    pub title_font_size: f64,
    pub heading_font_size: f64,
    pub body_font_size: f64,
    pub code_font_size: f64,
    pub title_color: String,
    pub heading_color: String,
    pub body_color: String,
    /// Fill behind `<pre>` blocks
    pub code_background: String,
    /// Used when the document declares no background of its own
    pub slide_background: String,
    /// Corner rounding applied to images without `border-radius` (inches)
    pub image_rounding: f64,
    /// Shrink overflowing slides instead of paginating them
    pub auto_scale: bool,
    /// Smallest scale auto-fit may use before falling back to pagination
    pub min_scale: f64,
    /// Remote image download timeout in seconds
    pub fetch_timeout_secs: u64,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            title_font_size: 44.0,
            heading_font_size: 32.0,
            body_font_size: 18.0,
            code_font_size: 14.0,
            title_color: "#1E3A5F".to_string(),
            heading_color: "#1E3A5F".to_string(),
            body_color: "#333333".to_string(),
            code_background: "#F5F5F5".to_string(),
            slide_background: String::new(),
            image_rounding: 0.0,
            auto_scale: true,
            min_scale: 0.6,
            fetch_timeout_secs: 30,
        }
    }
}

impl HtmlOptions {
    /// Parse options from a TOML string
    pub fn parse(toml_str: &str) -> Result<Self> {
        let options: Self = toml::from_str(toml_str)?;
        options.validate("<string>")?;
        Ok(options)
    }

    /// Load options from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let options: Self = toml::from_str(&content)?;
        options.validate(&path.display().to_string())?;
        Ok(options)
    }

    fn validate(&self, source_name: &str) -> Result<()> {
        let sizes = [
            ("title_font_size", self.title_font_size),
            ("heading_font_size", self.heading_font_size),
            ("body_font_size", self.body_font_size),
            ("code_font_size", self.code_font_size),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, size)| *size <= 0.0) {
            return Err(HtmlError::invalid_options(
                source_name,
                format!("{} must be positive", name),
            ));
        }
        if !(self.min_scale > 0.0 && self.min_scale <= 1.0) {
            return Err(HtmlError::invalid_options(
                source_name,
                format!("min_scale must be in (0, 1], got {}", self.min_scale),
            ));
        }
        Ok(())
    }
}
