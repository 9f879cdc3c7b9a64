//! HTML to slide outline.
//!
//! The document is parsed with html5ever into an `RcDom` and walked in
//! document order. `<h1>`, `<hr>` and `<section>` open new slides; block
//! elements become [`Block`]s on the current slide. Unknown elements are
//! transparent and their children are walked as if they were inlined.

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, Attribute};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use slidekit_pptx::Align;

use crate::style::{
    background_color, body_rule, parse_align, parse_dimension_attr, parse_font_size, parse_length,
    parse_style, Length, Style, PX_PER_INCH, SLIDE_HEIGHT_IN, SLIDE_WIDTH_IN,
};

/// One slide worth of parsed content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlSlide {
    /// Text of the opening `<h1>`; empty for untitled slides
    pub title: String,
    pub title_color: Option<String>,
    pub title_background: Option<String>,
    pub title_align: Option<Align>,
    /// Slide background inherited from `<body>`, `<style>` or `<div>`
    pub background: Option<String>,
    pub blocks: Vec<Block>,
}

/// A content block with its inline style
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub style: BlockStyle,
}

/// Style properties shared by every block kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockStyle {
    pub color: Option<String>,
    pub background: Option<String>,
    pub align: Option<Align>,
    /// Font size in points
    pub font_size: Option<f64>,
    /// Absolute `left` in inches
    pub left: Option<f64>,
    /// Absolute `top` in inches
    pub top: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Heading { level: u8, text: String },
    Text { text: String },
    Bullets { lines: Vec<BulletLine> },
    Code { text: String },
    Image(ImageBlock),
    Table { rows: Vec<Vec<String>> },
}

/// One `<li>`
#[derive(Debug, Clone, PartialEq)]
pub struct BulletLine {
    pub text: String,
    pub color: Option<String>,
}

/// Side an image floats to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Float {
    Left,
    Right,
}

/// `<img>` attributes; bytes are resolved separately before layout
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub src: String,
    pub alt: String,
    /// Width in CSS pixels
    pub width_px: Option<f64>,
    /// Height in CSS pixels
    pub height_px: Option<f64>,
    pub float: Option<Float>,
    /// `border-radius` in inches, or a negative fraction of the shorter side
    pub border_radius: Option<f64>,
    pub data: Vec<u8>,
    /// Extension declared by the source (`png`, `svg`, ...)
    pub format: String,
}

impl Block {
    /// Whether this block is a left or right floating image
    pub fn is_float(&self) -> bool {
        matches!(&self.kind, BlockKind::Image(img) if img.float.is_some())
    }
}

/// Parse an HTML document into slides
pub fn parse_html(html: &str) -> Vec<HtmlSlide> {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    let mut parser = OutlineParser::default();
    parser.walk(&dom.document);
    parser.finish()
}

#[derive(Default)]
struct OutlineParser {
    slides: Vec<HtmlSlide>,
    current: Option<HtmlSlide>,
    global_background: Option<String>,
}

impl OutlineParser {
    fn finish(mut self) -> Vec<HtmlSlide> {
        self.flush();
        self.slides
    }

    fn flush(&mut self) {
        if let Some(slide) = self.current.take() {
            self.slides.push(slide);
        }
    }

    fn open_slide(&mut self, slide: HtmlSlide) {
        self.flush();
        self.current = Some(HtmlSlide {
            background: self.global_background.clone(),
            ..slide
        });
    }

    fn add_block(&mut self, block: Block) {
        if self.current.is_none() {
            self.open_slide(HtmlSlide::default());
        }
        if let Some(slide) = self.current.as_mut() {
            slide.blocks.push(block);
        }
    }

    fn declare_background(&mut self, color: String, origin: &str) {
        if self.global_background.is_none() {
            log::debug!("Default slide background from <{}>: {}", origin, color);
            self.global_background = Some(color.clone());
        }
        if let Some(slide) = self.current.as_mut() {
            slide.background.get_or_insert(color);
        }
    }

    fn walk_children(&mut self, handle: &Handle) {
        for child in handle.children.borrow().iter() {
            self.walk(child);
        }
    }

    fn walk(&mut self, handle: &Handle) {
        let NodeData::Element { name, attrs, .. } = &handle.data else {
            self.walk_children(handle);
            return;
        };

        let tag = name.local.as_ref();
        let attrs = attrs.borrow();
        let style = parse_style(&get_attr(&attrs, "style").unwrap_or_default());

        match tag {
            "h1" => {
                let title = extract_text(handle);
                log::debug!("Slide title: {:?}", title);
                self.open_slide(HtmlSlide {
                    title,
                    title_color: style.get("color").map(str::to_string),
                    title_background: style.get("background-color").map(str::to_string),
                    title_align: align_of(&style, &attrs),
                    ..Default::default()
                });
            }
            "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag.as_bytes()[1] - b'0';
                let text = extract_text(handle);
                log::debug!("Heading h{}: {:?}", level, text);
                self.add_block(Block {
                    kind: BlockKind::Heading { level, text },
                    style: block_style(&style, &attrs),
                });
            }
            "p" => {
                let text = extract_text(handle);
                if !text.is_empty() {
                    self.add_block(Block {
                        kind: BlockKind::Text { text },
                        style: block_style(&style, &attrs),
                    });
                }
            }
            "ul" | "ol" => {
                let lines = list_items(handle);
                if !lines.is_empty() {
                    self.add_block(Block {
                        kind: BlockKind::Bullets { lines },
                        style: BlockStyle {
                            color: style.get("color").map(str::to_string),
                            ..Default::default()
                        },
                    });
                }
            }
            "pre" => {
                self.add_block(Block {
                    kind: BlockKind::Code {
                        text: extract_text(handle),
                    },
                    style: BlockStyle::default(),
                });
            }
            "img" => {
                if let Some(image) = image_block(&style, &attrs) {
                    log::debug!("Image: {}", abbreviate(&image.src));
                    self.add_block(Block {
                        kind: BlockKind::Image(image),
                        style: position_style(&style),
                    });
                }
            }
            "table" => {
                let rows = table_rows(handle);
                if !rows.is_empty() {
                    self.add_block(Block {
                        kind: BlockKind::Table { rows },
                        style: position_style(&style),
                    });
                }
            }
            "style" => {
                let css = extract_text(handle).replace('\n', " ");
                if let Some(color) = body_rule(&css).and_then(|rule| background_color(&rule, None)) {
                    self.declare_background(color, "style");
                }
            }
            "body" | "div" => {
                if let Some(color) = background_color(&style, get_attr(&attrs, "bgcolor").as_deref())
                {
                    self.declare_background(color, tag);
                }
                self.walk_children(handle);
            }
            "hr" => self.flush(),
            "section" => {
                self.flush();
                self.walk_children(handle);
                self.flush();
            }
            _ => {
                self.walk_children(handle);
            }
        }
    }
}

fn is_element(handle: &Handle, tag: &str) -> bool {
    matches!(&handle.data, NodeData::Element { name, .. } if name.local.as_ref() == tag)
}

fn get_attr(attrs: &[Attribute], name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|a| a.name.local.as_ref() == name)
        .map(|a| a.value.to_string())
}

/// Concatenated text of all descendant text nodes, trimmed
fn extract_text(handle: &Handle) -> String {
    let mut text = String::new();
    collect_text(handle, &mut text);
    text.trim().to_string()
}

fn collect_text(handle: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &handle.data {
        out.push_str(&contents.borrow());
    }
    for child in handle.children.borrow().iter() {
        collect_text(child, out);
    }
}

fn align_of(style: &Style, attrs: &[Attribute]) -> Option<Align> {
    style
        .get("text-align")
        .map(str::to_string)
        .or_else(|| get_attr(attrs, "align"))
        .and_then(|value| parse_align(&value))
}

/// `left`/`top` in inches; zero and negative values mean "flow position"
fn position(style: &Style, name: &str, reference: f64) -> Option<f64> {
    style
        .get(name)
        .and_then(parse_length)
        .map(|len| len.to_inches(reference))
        .filter(|v| *v > 0.0)
}

fn position_style(style: &Style) -> BlockStyle {
    BlockStyle {
        left: position(style, "left", SLIDE_WIDTH_IN),
        top: position(style, "top", SLIDE_HEIGHT_IN),
        ..Default::default()
    }
}

fn block_style(style: &Style, attrs: &[Attribute]) -> BlockStyle {
    BlockStyle {
        color: style.get("color").map(str::to_string),
        background: style.get("background-color").map(str::to_string),
        align: align_of(style, attrs),
        font_size: style.get("font-size").and_then(parse_font_size),
        ..position_style(style)
    }
}

fn list_items(handle: &Handle) -> Vec<BulletLine> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(|child| {
            let NodeData::Element { name, attrs, .. } = &child.data else {
                return None;
            };
            if name.local.as_ref() != "li" {
                return None;
            }
            let text = extract_text(child);
            if text.is_empty() {
                return None;
            }
            let style = parse_style(&get_attr(&attrs.borrow(), "style").unwrap_or_default());
            Some(BulletLine {
                text,
                color: style.get("color").map(str::to_string),
            })
        })
        .collect()
}

fn table_rows(handle: &Handle) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    collect_rows(handle, &mut rows);
    rows
}

fn collect_rows(handle: &Handle, rows: &mut Vec<Vec<String>>) {
    if is_element(handle, "tr") {
        let row: Vec<String> = handle
            .children
            .borrow()
            .iter()
            .filter(|c| is_element(c, "td") || is_element(c, "th"))
            .map(extract_text)
            .collect();
        if !row.is_empty() {
            rows.push(row);
        }
        return;
    }
    for child in handle.children.borrow().iter() {
        collect_rows(child, rows);
    }
}

fn image_block(style: &Style, attrs: &[Attribute]) -> Option<ImageBlock> {
    let src = get_attr(attrs, "src").map(|s| s.trim().to_string())?;
    if src.is_empty() {
        return None;
    }

    // Style dimensions win over the width/height attributes
    let css_px = |name: &str, reference: f64| {
        style
            .get(name)
            .and_then(parse_length)
            .map(|len| len.to_inches(reference) * PX_PER_INCH)
            .filter(|px| *px > 0.0)
    };
    let width_px = css_px("width", SLIDE_WIDTH_IN)
        .or_else(|| get_attr(attrs, "width").as_deref().and_then(parse_dimension_attr));
    let height_px = css_px("height", SLIDE_HEIGHT_IN)
        .or_else(|| get_attr(attrs, "height").as_deref().and_then(parse_dimension_attr));

    let float = match style.get("float").map(str::to_ascii_lowercase).as_deref() {
        Some("left") => Some(Float::Left),
        Some("right") => Some(Float::Right),
        _ => None,
    };

    // Percentages become a negative fraction of the shorter side
    let border_radius = style
        .get("border-radius")
        .and_then(parse_length)
        .and_then(|len| match len {
            Length::Percent(pct) if pct > 0.0 => Some(-pct / 100.0),
            Length::Percent(_) => None,
            len => Some(len.to_inches(SLIDE_WIDTH_IN)).filter(|r| *r > 0.0),
        });

    Some(ImageBlock {
        src,
        alt: get_attr(attrs, "alt").unwrap_or_default(),
        width_px,
        height_px,
        float,
        border_radius,
        data: Vec::new(),
        format: String::new(),
    })
}

/// Shorten data URIs for log output
fn abbreviate(src: &str) -> &str {
    if src.starts_with("data:") {
        src.split(',').next().unwrap_or(src)
    } else {
        src
    }
}
