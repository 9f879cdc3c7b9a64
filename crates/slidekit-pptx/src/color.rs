//! Color literal normalization.
//!
//! Every color stored in the model goes through [`normalize_color`] before it
//! reaches an `a:srgbClr val="..."` attribute. Normalization is total: unknown
//! input falls through unchanged, and callers that need a guarantee use
//! [`validate_color`].

use crate::error::{PptxError, Result};

/// Named colors recognized by [`normalize_color`]
const NAMED_COLORS: &[(&str, &str)] = &[
    ("red", "FF0000"),
    ("green", "00FF00"),
    ("blue", "0000FF"),
    ("black", "000000"),
    ("white", "FFFFFF"),
    ("yellow", "FFFF00"),
    ("orange", "FFA500"),
    ("purple", "800080"),
    ("gray", "808080"),
    ("grey", "808080"),
];

/// Normalize a color literal to six hex characters.
///
/// Accepts `#RGB`, `#RRGGBB`, `RRGGBB` and a handful of names. An empty
/// string yields black. Case of hex digits is preserved.
pub fn normalize_color(color: &str) -> String {
    let color = color.trim();
    if color.is_empty() {
        return "000000".to_string();
    }

    let lower = color.to_ascii_lowercase();
    if let Some((_, hex)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
        return (*hex).to_string();
    }

    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.chars().count() == 3 {
        return hex.chars().flat_map(|c| [c, c]).collect();
    }

    hex.to_string()
}

/// Check that a color literal normalizes to six hex digits
pub fn validate_color(color: &str) -> Result<()> {
    let normalized = normalize_color(color);
    if normalized.len() != 6 {
        return Err(PptxError::invalid_color(
            color,
            "expected 6 hexadecimal digits",
        ));
    }
    if let Some(bad) = normalized.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(PptxError::invalid_color(
            color,
            format!("invalid character '{}'", bad),
        ));
    }
    Ok(())
}

/// Normalize an optional color, treating empty strings as absent
pub(crate) fn normalize_opt(color: &str) -> Option<String> {
    if color.trim().is_empty() {
        None
    } else {
        Some(normalize_color(color))
    }
}
