//! # slidekit-pptx
//!
//! PowerPoint (PPTX) generation from an in-memory document model.
//!
//! A [`Presentation`] owns ordered slides and a shared media pool. Slides are
//! populated through a [`SlideBuilder`] with text boxes, preset shapes, tables,
//! images, charts, audio and video; [`PptxWriter`] then streams every OOXML part
//! into a deflate ZIP.
//!
//! ## Features
//!
//! - **Document model**: tagged [`SlideObject`] variants, insertion order is z-order
//! - **Relationship graph**: media and chart relationship ids allocated from disjoint ranges
//! - **Charts**: bar, stacked bar, line, smooth line, pie, 3D pie, doughnut and area
//! - **Media auto-play**: slide timing trees firing `playFrom(0.0)` on slide entry
//!
//! ## Example
//!
//! ```rust,no_run
//! use slidekit_pptx::{Presentation, TextOptions};
//!
//! let mut pres = Presentation::new();
//! pres.set_title("Quarterly review");
//! pres.add_slide().add_text(
//!     "Hello",
//!     TextOptions {
//!         x: 1.0,
//!         y: 1.0,
//!         width: 8.0,
//!         height: 1.0,
//!         font_size: 24.0,
//!         bold: true,
//!         ..Default::default()
//!     },
//! );
//! let bytes = pres.to_bytes()?;
//! std::fs::write("review.pptx", bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod chart;
pub mod color;
pub mod error;
pub mod media;
pub mod model;
pub mod presentation;
pub mod relationships;
pub mod slide;
pub mod timing;
pub mod units;
pub mod writer;
pub mod xml;

// Re-exports
pub use chart::{ChartOptions, ChartSeries, ChartType, LegendPosition};
pub use color::{normalize_color, validate_color};
pub use error::{PptxError, Result};
pub use model::{
    Align, AudioOptions, Background, BackgroundOptions, Border, BorderStyle, ImageOptions,
    ShapeOptions, ShapeType, SlideLayout, SlideObject, TableCell, TableOptions, TextOptions,
    VerticalAlign, VideoOptions,
};
pub use presentation::{DocumentProperties, MediaEntry, MediaKind, Presentation};
pub use relationships::{Relationship, Relationships};
pub use slide::{Slide, SlideBuilder};
pub use timing::MediaTrigger;
pub use writer::PptxWriter;

/// PPTX-related constants
pub mod constants {
    /// Default slide width in EMU (10")
    pub const DEFAULT_SLIDE_WIDTH_EMU: i64 = 9_144_000;

    /// Default slide height in EMU (5.625", 16:9)
    pub const DEFAULT_SLIDE_HEIGHT_EMU: i64 = 5_143_500;

    /// 4:3 slide height in EMU (7.5")
    pub const SLIDE_HEIGHT_4X3_EMU: i64 = 6_858_000;

    /// 16:10 slide height in EMU (6.25")
    pub const SLIDE_HEIGHT_16X10_EMU: i64 = 5_715_000;

    /// Notes page size in EMU (portrait 7.5" x 10")
    pub const NOTES_WIDTH_EMU: i64 = 6_858_000;
    pub const NOTES_HEIGHT_EMU: i64 = 9_144_000;

    /// EMU per inch
    pub const EMU_PER_INCH: i64 = 914_400;

    /// EMU per point
    pub const EMU_PER_POINT: i64 = 12_700;

    /// EMU per centimeter
    pub const EMU_PER_CM: i64 = 360_000;

    /// DrawingML rotation units per degree
    pub const ROTATION_UNITS_PER_DEGREE: i64 = 60_000;

    /// Slide master id (first id in the master range)
    pub const SLIDE_MASTER_ID: u32 = 2_147_483_648;

    /// Slide layout id
    pub const SLIDE_LAYOUT_ID: u32 = 2_147_483_649;

    /// First slide id in `p:sldIdLst`
    pub const FIRST_SLIDE_ID: u32 = 256;

    /// Relationship id offsets per media kind, added to the media pool index
    pub const IMAGE_REL_OFFSET: usize = 100;
    pub const CHART_REL_OFFSET: usize = 200;
    pub const VIDEO_REL_OFFSET: usize = 300;
    pub const AUDIO_REL_OFFSET: usize = 400;
    pub const MEDIA_EMBED_REL_OFFSET: usize = 500;

    /// Category and value axis ids shared by every chart part
    pub const CATEGORY_AXIS_ID: u32 = 1;
    pub const VALUE_AXIS_ID: u32 = 2;

    /// Default Office table style
    pub const DEFAULT_TABLE_STYLE_ID: &str = "{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}";

    /// Extension URI hosting `p14:media`
    pub const MEDIA_EXT_URI: &str = "{DAA4B4D4-6D71-4841-9C94-3DE7FCFB9230}";

    /// PresentationML namespace
    pub const NS_PRESENTATION: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

    /// DrawingML namespace
    pub const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

    /// DrawingML chart namespace
    pub const NS_CHART: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";

    /// DrawingML table graphic data URI
    pub const NS_TABLE: &str = "http://schemas.openxmlformats.org/drawingml/2006/table";

    /// Relationships namespace
    pub const NS_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    /// Package relationships namespace
    pub const NS_PACKAGE_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships";

    /// Content types namespace
    pub const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

    /// PowerPoint 2010 extension namespace
    pub const NS_P14: &str = "http://schemas.microsoft.com/office/powerpoint/2010/main";

    /// Slide relationship type
    pub const REL_TYPE_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

    /// Slide layout relationship type
    pub const REL_TYPE_SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";

    /// Slide master relationship type
    pub const REL_TYPE_SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";

    /// Theme relationship type
    pub const REL_TYPE_THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

    /// Presentation properties relationship type
    pub const REL_TYPE_PRES_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";

    /// View properties relationship type
    pub const REL_TYPE_VIEW_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";

    /// Table styles relationship type
    pub const REL_TYPE_TABLE_STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";

    /// Main document relationship type
    pub const REL_TYPE_OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

    /// Core properties relationship type
    pub const REL_TYPE_CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

    /// Extended properties relationship type
    pub const REL_TYPE_EXTENDED_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";

    /// Image relationship type
    pub const REL_TYPE_IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

    /// Chart relationship type
    pub const REL_TYPE_CHART: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart";

    /// Video relationship type
    pub const REL_TYPE_VIDEO: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/video";

    /// Audio relationship type
    pub const REL_TYPE_AUDIO: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/audio";

    /// Embedded media relationship type (PowerPoint 2010+)
    pub const REL_TYPE_MEDIA: &str = "http://schemas.microsoft.com/office/2007/relationships/media";
}
