//! Resolving `<img src>` to bytes.
//!
//! Three kinds of source are understood: `data:` URIs, `http(s)://` URLs
//! (only with the `remote-images` feature) and local paths. Relative paths
//! resolve against the directory of the HTML file when there is one.

use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE};
use base64::Engine;

use crate::error::{HtmlError, Result};
use crate::parser::{BlockKind, HtmlSlide};

/// User agent sent with image downloads; some hosts refuse unknown clients
#[cfg(feature = "remote-images")]
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Image bytes with the extension their source declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    /// Lowercase extension without the dot
    pub ext: String,
}

/// Loads image sources for one conversion
#[derive(Debug, Clone)]
pub struct ImageLoader {
    base_dir: Option<PathBuf>,
    timeout: Duration,
}

impl ImageLoader {
    pub fn new(timeout: Duration) -> Self {
        Self {
            base_dir: None,
            timeout,
        }
    }

    /// Resolve relative paths against `dir`
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Fetch the bytes behind `src`
    pub fn load(&self, src: &str) -> Result<ImageData> {
        if src.starts_with("data:") {
            return parse_data_uri(src);
        }
        if src.starts_with("http://") || src.starts_with("https://") {
            return self.download(src);
        }

        let path = src.strip_prefix("file://").unwrap_or(src);
        let path = match &self.base_dir {
            Some(base) if Path::new(path).is_relative() => base.join(path),
            _ => PathBuf::from(path),
        };
        let bytes = std::fs::read(&path)?;
        if bytes.is_empty() {
            return Err(HtmlError::image_source(src, "file is empty"));
        }
        Ok(ImageData {
            bytes,
            ext: ext_from_path(src).unwrap_or_else(|| "png".to_string()),
        })
    }

    #[cfg(feature = "remote-images")]
    fn download(&self, url: &str) -> Result<ImageData> {
        log::debug!("Downloading image: {}", url);
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let response = client.get(url).send()?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(HtmlError::image_source(
                url,
                format!("HTTP status {}", response.status()),
            ));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let bytes = response.bytes()?.to_vec();

        let url_path = url.split(['?', '#']).next().unwrap_or(url);
        let ext = ext_from_path(url_path).unwrap_or_else(|| ext_from_content_type(&content_type));
        log::debug!("Downloaded {} bytes ({})", bytes.len(), ext);
        Ok(ImageData { bytes, ext })
    }

    #[cfg(not(feature = "remote-images"))]
    fn download(&self, url: &str) -> Result<ImageData> {
        let _ = self.timeout;
        Err(HtmlError::image_source(
            url,
            "remote images are disabled (enable the `remote-images` feature)",
        ))
    }
}

/// Load every image block's bytes, dropping blocks whose source fails
pub fn resolve_images(slides: &mut [HtmlSlide], loader: &ImageLoader) {
    for slide in slides.iter_mut() {
        slide.blocks.retain_mut(|block| {
            let BlockKind::Image(image) = &mut block.kind else {
                return true;
            };
            match loader.load(&image.src) {
                Ok(data) => {
                    image.data = data.bytes;
                    image.format = data.ext;
                    true
                }
                Err(e) => {
                    log::warn!("Dropping image '{}': {}", abbreviate(&image.src), e);
                    false
                }
            }
        });
    }
}

/// Decode a `data:<mime>[;base64],<payload>` URI
///
/// The payload is tried as standard base64, then URL-safe, then standard
/// without padding.
pub fn parse_data_uri(uri: &str) -> Result<ImageData> {
    let content = uri.strip_prefix("data:").unwrap_or(uri);
    let (header, payload) = content
        .split_once(',')
        .ok_or_else(|| HtmlError::image_source(abbreviate(uri), "missing ',' in data URI"))?;

    let mime = header.split(';').next().unwrap_or_default().trim();
    let payload = payload.trim();

    let bytes = STANDARD
        .decode(payload)
        .or_else(|_| URL_SAFE.decode(payload))
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|e| HtmlError::image_source(abbreviate(uri), e.to_string()))?;
    if bytes.is_empty() {
        return Err(HtmlError::image_source(abbreviate(uri), "empty payload"));
    }

    Ok(ImageData {
        bytes,
        ext: ext_from_mime(mime).to_string(),
    })
}

fn ext_from_mime(mime: &str) -> &'static str {
    match mime.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/bmp" => "bmp",
        _ => "png",
    }
}

#[cfg(feature = "remote-images")]
fn ext_from_content_type(content_type: &str) -> String {
    let ext = if content_type.contains("png") {
        "png"
    } else if content_type.contains("jpeg") || content_type.contains("jpg") {
        "jpg"
    } else if content_type.contains("gif") {
        "gif"
    } else if content_type.contains("webp") {
        "webp"
    } else {
        "png"
    };
    ext.to_string()
}

fn ext_from_path(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| !ext.is_empty() && ext.len() <= 5)
}

fn abbreviate(uri: &str) -> String {
    uri.chars().take(40).collect()
}
