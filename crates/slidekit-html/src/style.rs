//! Inline CSS handling: declarations, lengths, font sizes and backgrounds.
//!
//! Only the handful of properties the layout engine reads are interpreted.
//! Malformed values never fail; they simply come back as `None`.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use slidekit_pptx::Align;

/// Slide width in inches, the reference for horizontal percentages
pub const SLIDE_WIDTH_IN: f64 = 10.0;

/// Slide height in inches, the reference for vertical percentages
pub const SLIDE_HEIGHT_IN: f64 = 5.625;

/// Pixels per inch for CSS `px` and HTML `width`/`height` attributes
pub const PX_PER_INCH: f64 = 96.0;

/// Parsed `style="..."` declarations
///
/// Property names are lowercased; values are trimmed but otherwise kept verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    props: HashMap<String, String>,
}

impl Style {
    /// Look up a non-empty property value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.props
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }
}

/// Split a declaration block (`a: b; c: d`) into a [`Style`]
pub fn parse_style(style: &str) -> Style {
    let props = style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            if name.is_empty() {
                return None;
            }
            Some((name, value.trim().to_string()))
        })
        .collect();
    Style { props }
}

/// A CSS length with its unit preserved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Inch(f64),
    Point(f64),
    Pixel(f64),
    /// Percentage of a reference dimension (`50%` is `Percent(50.0)`)
    Percent(f64),
}

impl Length {
    /// Resolve to inches; percentages are taken of `reference` (inches)
    pub fn to_inches(self, reference: f64) -> f64 {
        match self {
            Self::Inch(v) => v,
            Self::Point(v) => v / 72.0,
            Self::Pixel(v) => v / PX_PER_INCH,
            Self::Percent(v) => reference * v / 100.0,
        }
    }
}

/// Parse `12px`, `9pt`, `1.5in`, `50%` or a bare number (inches)
pub fn parse_length(value: &str) -> Option<Length> {
    let value = value.trim().to_ascii_lowercase();
    let (number, unit): (&str, fn(f64) -> Length) = if let Some(n) = value.strip_suffix("px") {
        (n, Length::Pixel)
    } else if let Some(n) = value.strip_suffix("pt") {
        (n, Length::Point)
    } else if let Some(n) = value.strip_suffix("in") {
        (n, Length::Inch)
    } else if let Some(n) = value.strip_suffix('%') {
        (n, Length::Percent)
    } else {
        (value.as_str(), Length::Inch)
    };

    let number: f64 = number.trim().parse().ok()?;
    number.is_finite().then(|| unit(number))
}

/// Font size in points: `px` are converted at 0.75 pt/px, `pt` and bare numbers are points
pub fn parse_font_size(value: &str) -> Option<f64> {
    let value = value.trim().to_ascii_lowercase();
    let size = if let Some(px) = value.strip_suffix("px") {
        px.trim().parse::<f64>().ok()? * 0.75
    } else if let Some(pt) = value.strip_suffix("pt") {
        pt.trim().parse::<f64>().ok()?
    } else {
        value.parse::<f64>().ok()?
    };
    (size.is_finite() && size > 0.0).then_some(size)
}

/// CSS `text-align` or the legacy `align` attribute
pub fn parse_align(value: &str) -> Option<Align> {
    Align::parse(value)
}

/// Leading integer of an HTML dimension attribute (`"640"`, `"640px"`)
pub fn parse_dimension_attr(value: &str) -> Option<f64> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f64>().ok().filter(|v| *v > 0.0)
}

/// Background color declared by a style, falling back to a `bgcolor` attribute
///
/// `background-color` wins over the `background` shorthand. Gradients and other
/// compound values yield their first hex color; a plain keyword such as `navy`
/// is returned unchanged.
pub fn background_color(style: &Style, bgcolor: Option<&str>) -> Option<String> {
    if let Some(color) = style.get("background-color") {
        return Some(color.to_string());
    }
    if let Some(shorthand) = style.get("background") {
        if let Some(color) = first_color(shorthand) {
            return Some(color);
        }
    }
    bgcolor
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

fn first_color(value: &str) -> Option<String> {
    static HEX_RE: OnceLock<Regex> = OnceLock::new();
    let re = HEX_RE
        .get_or_init(|| Regex::new(r"#(?:[0-9a-fA-F]{6}|[0-9a-fA-F]{3})\b").expect("hex color pattern"));

    if let Some(m) = re.find(value) {
        return Some(m.as_str().to_string());
    }
    if value.contains('(') {
        return None;
    }
    value.split_whitespace().next().map(str::to_string)
}

/// Declarations of the `body { ... }` rule inside a `<style>` element
pub fn body_rule(css: &str) -> Option<Style> {
    static BODY_RE: OnceLock<Regex> = OnceLock::new();
    let re = BODY_RE.get_or_init(|| Regex::new(r"body\s*\{([^}]+)\}").expect("body rule pattern"));

    re.captures(css)
        .and_then(|cap| cap.get(1))
        .map(|m| parse_style(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style() {
        let style = parse_style(" Color: #FFF ; FONT-SIZE:24px;;bogus; left: ");
        assert_eq!(style.get("color"), Some("#FFF"));
        assert_eq!(style.get("font-size"), Some("24px"));
        assert_eq!(style.get("bogus"), None);
        // Present but empty
        assert_eq!(style.get("left"), None);
        assert!(parse_style("").is_empty());
    }

    #[test]
    fn test_parse_length_units() {
        assert_eq!(parse_length("96px"), Some(Length::Pixel(96.0)));
        assert_eq!(parse_length("72pt"), Some(Length::Point(72.0)));
        assert_eq!(parse_length("1.5in"), Some(Length::Inch(1.5)));
        assert_eq!(parse_length("2"), Some(Length::Inch(2.0)));
        assert_eq!(parse_length("50%"), Some(Length::Percent(50.0)));
        assert_eq!(parse_length(" 48PX "), Some(Length::Pixel(48.0)));
        assert_eq!(parse_length("auto"), None);
        assert_eq!(parse_length(""), None);
    }

    #[test]
    fn test_length_to_inches() {
        assert_eq!(Length::Pixel(96.0).to_inches(SLIDE_WIDTH_IN), 1.0);
        assert_eq!(Length::Point(36.0).to_inches(SLIDE_WIDTH_IN), 0.5);
        assert_eq!(Length::Percent(50.0).to_inches(SLIDE_WIDTH_IN), 5.0);
        assert_eq!(Length::Percent(20.0).to_inches(SLIDE_HEIGHT_IN), 1.125);
    }

    #[test]
    fn test_parse_font_size() {
        assert_eq!(parse_font_size("32px"), Some(24.0));
        assert_eq!(parse_font_size("20pt"), Some(20.0));
        assert_eq!(parse_font_size("18"), Some(18.0));
        assert_eq!(parse_font_size("large"), None);
        assert_eq!(parse_font_size("0"), None);
    }

    #[test]
    fn test_parse_align() {
        assert_eq!(parse_align("center"), Some(Align::Center));
        assert_eq!(parse_align("justify"), Some(Align::Justify));
        assert_eq!(parse_align("middle"), None);
    }

    #[test]
    fn test_dimension_attr() {
        assert_eq!(parse_dimension_attr("640"), Some(640.0));
        assert_eq!(parse_dimension_attr("480px"), Some(480.0));
        assert_eq!(parse_dimension_attr("auto"), None);
    }

    #[test]
    fn test_background_color() {
        let style = parse_style("background-color: #123456; background: red");
        assert_eq!(background_color(&style, None).as_deref(), Some("#123456"));

        let style = parse_style("background: #000");
        assert_eq!(background_color(&style, None).as_deref(), Some("#000"));

        let style = parse_style("background: linear-gradient(135deg, #667eea 0%, #764ba2 100%)");
        assert_eq!(background_color(&style, None).as_deref(), Some("#667eea"));

        let style = parse_style("background: navy");
        assert_eq!(background_color(&style, None).as_deref(), Some("navy"));

        let style = parse_style("background: linear-gradient(red, blue)");
        assert_eq!(background_color(&style, Some("white")).as_deref(), Some("white"));

        assert_eq!(background_color(&Style::default(), Some("  ")), None);
    }

    #[test]
    fn test_body_rule() {
        let css = "h1 { color: red }\nbody {\n  margin: 0;\n  background-color: #FAFAFA;\n}";
        let style = body_rule(css).unwrap();
        assert_eq!(style.get("background-color"), Some("#FAFAFA"));
        assert!(body_rule("p { color: red }").is_none());
    }
}
