//! Slide object model.
//!
//! Every object placed on a slide is a [`SlideObject`] variant. Positions are
//! in inches and converted to EMU only when XML is emitted. Colors are stored
//! as the caller wrote them; an empty string means "not set".

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::chart::{ChartOptions, ChartSeries, ChartType};

/// Default font face for text boxes and tables
pub const DEFAULT_FONT_FACE: &str = "Microsoft YaHei";

/// Default font size for text boxes, in points
pub const DEFAULT_FONT_SIZE: f64 = 18.0;

/// Default text color
pub const DEFAULT_FONT_COLOR: &str = "000000";

/// Slide layout tag
///
/// Only a blank layout part is emitted; the tag is kept on slides for callers
/// that group or filter slides by intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlideLayout {
    #[default]
    Blank,
    Title,
    TitleContent,
    TwoContent,
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Align {
    /// Value of the `algn` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "l",
            Self::Center => "ctr",
            Self::Right => "r",
            Self::Justify => "just",
        }
    }

    /// Parse an `algn` value or a CSS `text-align` keyword
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "l" | "left" => Some(Self::Left),
            "ctr" | "center" => Some(Self::Center),
            "r" | "right" => Some(Self::Right),
            "just" | "justify" => Some(Self::Justify),
            _ => None,
        }
    }
}

/// Vertical text anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl VerticalAlign {
    /// Value of the `anchor` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "t",
            Self::Middle => "ctr",
            Self::Bottom => "b",
        }
    }
}

/// Outline dash style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dash,
    Dot,
    None,
}

impl BorderStyle {
    /// Value of `a:prstDash`, `None` when no outline is drawn
    pub fn preset_dash(&self) -> Option<&'static str> {
        match self {
            Self::Solid => Some("solid"),
            Self::Dash => Some("dash"),
            Self::Dot => Some("sysDot"),
            Self::None => None,
        }
    }
}

/// Preset geometry for shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeType {
    #[default]
    #[serde(rename = "rect")]
    Rect,
    #[serde(rename = "roundRect")]
    RoundRect,
    #[serde(rename = "ellipse")]
    Ellipse,
    #[serde(rename = "triangle")]
    Triangle,
    #[serde(rename = "diamond")]
    Diamond,
    #[serde(rename = "rightArrow")]
    RightArrow,
    #[serde(rename = "leftArrow")]
    LeftArrow,
    #[serde(rename = "upArrow")]
    UpArrow,
    #[serde(rename = "downArrow")]
    DownArrow,
    #[serde(rename = "star5")]
    Star5,
    #[serde(rename = "heart")]
    Heart,
    #[serde(rename = "line")]
    Line,
}

impl ShapeType {
    /// DrawingML preset name (`prstGeom prst=...`)
    pub fn preset(&self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::RoundRect => "roundRect",
            Self::Ellipse => "ellipse",
            Self::Triangle => "triangle",
            Self::Diamond => "diamond",
            Self::RightArrow => "rightArrow",
            Self::LeftArrow => "leftArrow",
            Self::UpArrow => "upArrow",
            Self::DownArrow => "downArrow",
            Self::Star5 => "star5",
            Self::Heart => "heart",
            Self::Line => "line",
        }
    }
}

/// Text box options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// Position and size in inches
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    /// Font family (Latin and East Asian)
    pub font_face: String,

    /// Font size in points
    pub font_size: f64,

    /// Text color
    pub font_color: String,

    pub bold: bool,
    pub italic: bool,
    pub underline: bool,

    /// Horizontal alignment
    pub align: Option<Align>,

    /// Vertical anchoring
    pub valign: Option<VerticalAlign>,

    /// Line spacing multiplier (1.0 = single)
    pub line_spacing: f64,

    /// Rotation in degrees
    pub rotate: f64,

    /// Character spacing in points
    pub char_spacing: f64,

    /// Inner margin in inches, applied to all four sides
    pub margin: f64,

    /// Background fill; empty for none
    pub fill: String,
}

/// Shape options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeOptions {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    /// Fill color
    pub fill: String,

    /// Outline color
    pub line_color: String,

    /// Outline width in points
    pub line_width: f64,

    /// Outline dash style
    pub line_style: BorderStyle,

    /// Rotation in degrees
    pub rotate: f64,

    /// Fill transparency, 0 (opaque) to 100
    pub transparency: f64,

    /// Draw an outer drop shadow
    pub shadow: bool,
}

/// Table border settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Border {
    pub color: String,
    /// Width in points
    pub width: f64,
    pub style: BorderStyle,
}

/// Table options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    pub x: f64,
    pub y: f64,

    /// Total width in inches (default 8)
    pub width: f64,

    /// Per-row heights in inches; missing rows use 0.4
    pub row_heights: Vec<f64>,

    /// Per-column widths in inches; empty splits `width` evenly
    pub col_widths: Vec<f64>,

    pub font_face: String,
    pub font_size: f64,
    pub font_color: String,

    /// Default cell fill
    pub fill: String,

    pub border: Border,

    /// Bold text in the first row
    pub first_row_bold: bool,

    /// Fill for the first row
    pub first_row_fill: String,
}

/// A single table cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableCell {
    pub text: String,

    /// Overrides of the table defaults
    pub font_face: String,
    pub font_size: f64,
    pub font_color: String,

    pub bold: bool,
    pub italic: bool,
    pub fill: String,
    pub align: Option<Align>,
    pub valign: Option<VerticalAlign>,

    /// Columns spanned (values above 1 emit `gridSpan`)
    pub col_span: u32,

    /// Rows spanned (values above 1 emit `rowSpan`)
    pub row_span: u32,
}

impl TableCell {
    /// Create a cell holding plain text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Make the cell bold
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Set the cell fill
    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Span `cols` columns
    pub fn with_col_span(mut self, cols: u32) -> Self {
        self.col_span = cols;
        self
    }
}

impl From<&str> for TableCell {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Image options
///
/// Either `path` or `data` supplies the picture; `path` wins when both are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    /// Local file to embed
    pub path: Option<PathBuf>,

    /// Raw image bytes
    #[serde(skip)]
    pub data: Vec<u8>,

    /// Extension for `data` that cannot be sniffed (`svg`); empty means sniff
    pub format: String,

    /// Alternative text (`descr`)
    pub alt_text: String,

    /// Rotation in degrees
    pub rotate: f64,

    /// Corner radius in inches; a negative value is a fraction of the
    /// shorter side (`-0.5` is fully rounded)
    pub rounding: f64,
}

/// Slide background request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundOptions {
    /// Solid color
    pub color: String,

    /// Background picture file
    pub image: Option<PathBuf>,

    /// Background picture bytes
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// Video options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoOptions {
    pub x: f64,
    pub y: f64,
    /// Width in inches (default 6)
    pub width: f64,
    /// Height in inches (default 4)
    pub height: f64,

    pub path: Option<PathBuf>,
    #[serde(skip)]
    pub data: Vec<u8>,

    /// Poster frame shown before playback
    pub poster_path: Option<PathBuf>,
    #[serde(skip)]
    pub poster_data: Vec<u8>,

    /// Start playback on slide entry
    pub auto_play: bool,
    pub looping: bool,
    pub muted: bool,
}

/// Audio options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioOptions {
    pub x: f64,
    pub y: f64,
    /// Icon width in inches (default 0.5)
    pub width: f64,
    /// Icon height in inches (default 0.5)
    pub height: f64,

    pub path: Option<PathBuf>,
    #[serde(skip)]
    pub data: Vec<u8>,

    /// Start playback on slide entry
    pub auto_play: bool,
    pub looping: bool,

    /// Hide the speaker icon (background music)
    pub hidden: bool,
}

/// A media part referenced from a slide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    /// Relationship id inside the slide's rels part
    pub rel_id: String,

    /// Relationship id of the PowerPoint 2010 media embed; empty for pictures
    pub embed_rel_id: String,

    /// File name under `ppt/media/`
    pub file_name: String,

    /// 1-based position in the presentation's media pool
    pub index: usize,
}

impl MediaRef {
    /// Relationship target relative to a slide part
    pub fn target(&self) -> String {
        format!("../media/{}", self.file_name)
    }
}

/// Resolved slide background
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    /// Solid fill, normalized hex
    Color(String),
    /// Stretched picture from the media pool
    Image(MediaRef),
}

/// A text box
#[derive(Debug, Clone, PartialEq)]
pub struct TextObject {
    pub text: String,
    pub options: TextOptions,
}

/// A preset shape, optionally with centered text
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeObject {
    pub shape_type: ShapeType,
    pub options: ShapeOptions,
    pub text: Option<String>,
}

/// A table
#[derive(Debug, Clone, PartialEq)]
pub struct TableObject {
    pub rows: Vec<Vec<TableCell>>,
    pub options: TableOptions,
}

impl TableObject {
    /// Number of grid columns (widest row, counting spans)
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.col_span.max(1) as usize).sum())
            .max()
            .unwrap_or(0)
    }
}

/// An embedded picture
#[derive(Debug, Clone, PartialEq)]
pub struct ImageObject {
    pub options: ImageOptions,
    pub media: MediaRef,
}

/// A chart backed by its own chart part
#[derive(Debug, Clone, PartialEq)]
pub struct ChartObject {
    pub chart_type: ChartType,
    pub series: Vec<ChartSeries>,
    pub options: ChartOptions,

    /// 1-based index across the whole presentation
    pub index: usize,

    /// Relationship id of the chart part inside the slide rels
    pub rel_id: String,
}

impl ChartObject {
    /// Part name inside the package
    pub fn part_name(&self) -> String {
        format!("ppt/charts/chart{}.xml", self.index)
    }
}

/// An embedded video
#[derive(Debug, Clone, PartialEq)]
pub struct VideoObject {
    pub options: VideoOptions,
    pub media: MediaRef,
    pub poster: Option<MediaRef>,
}

/// An embedded audio clip
#[derive(Debug, Clone, PartialEq)]
pub struct AudioObject {
    pub options: AudioOptions,
    pub media: MediaRef,
}

/// Anything that can be placed on a slide.
///
/// Insertion order on the slide is emission order and therefore z-order.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideObject {
    Text(TextObject),
    Shape(ShapeObject),
    Table(TableObject),
    Image(ImageObject),
    Chart(ChartObject),
    Video(VideoObject),
    Audio(AudioObject),
}

impl SlideObject {
    /// Short kind name, used in logs and tests
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Shape(_) => "shape",
            Self::Table(_) => "table",
            Self::Image(_) => "image",
            Self::Chart(_) => "chart",
            Self::Video(_) => "video",
            Self::Audio(_) => "audio",
        }
    }

    /// Whether the object requests playback on slide entry
    pub fn auto_plays(&self) -> bool {
        match self {
            Self::Video(v) => v.options.auto_play,
            Self::Audio(a) => a.options.auto_play,
            _ => false,
        }
    }
}
