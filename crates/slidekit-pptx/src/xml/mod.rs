//! OOXML part emitters.
//!
//! Parts are assembled as UTF-8 text with `format!`; every user-supplied
//! string goes through [`escape_xml`] first.

pub mod objects;
pub mod parts;
pub mod slide;

use crate::color::normalize_color;

/// Escape `& < > " '` for element text and attribute values
pub fn escape_xml(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}

/// `<a:xfrm>` (or `<p:xfrm>` for graphic frames) with optional rotation
pub(crate) fn xfrm(tag: &str, x: i64, y: i64, cx: i64, cy: i64, rot: i64) -> String {
    let rot_attr = if rot != 0 {
        format!(r#" rot="{}""#, rot)
    } else {
        String::new()
    };
    format!(
        r#"<{tag}{rot_attr}><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></{tag}>"#,
        tag = tag,
        rot_attr = rot_attr,
        x = x,
        y = y,
        cx = cx,
        cy = cy
    )
}

/// `<a:solidFill>` for a color literal
pub(crate) fn solid_fill(color: &str) -> String {
    format!(
        r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
        normalize_color(color)
    )
}
