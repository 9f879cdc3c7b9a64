//! Block flow layout.
//!
//! Each [`HtmlSlide`] is laid out top to bottom on a 10" x 5.625" canvas.
//! A cursor `y` advances past every block; a left or right floating image
//! narrows the following blocks into the opposite column until the cursor
//! passes the bottom of the image.
//!
//! Measuring and rendering are the same walk, [`place_blocks`], run with a
//! different [`Pass`]. A slide whose natural height overflows the canvas is
//! first measured, then rendered at a uniform scale that makes every block
//! fit. Below `min_scale` (or with auto-scale disabled) the slide is rendered
//! at full size and paginated instead.

use slidekit_pptx::{
    BackgroundOptions, ImageOptions, Presentation, ShapeOptions, ShapeType, SlideBuilder,
    TableCell, TableOptions, TextOptions,
};

use crate::options::HtmlOptions;
use crate::parser::{Block, BlockKind, BulletLine, Float, HtmlSlide, ImageBlock};
use crate::style::{PX_PER_INCH, SLIDE_WIDTH_IN};

/// First cursor position
const TOP: f64 = 0.5;
const TITLE_HEIGHT: f64 = 0.8;
const TITLE_ADVANCE: f64 = 1.0;

/// Strict pagination threshold
const PAGE_BOTTOM: f64 = 5.2;
/// Natural height above which a slide is scaled down
const FIT_TRIGGER: f64 = 5.6;
/// Lowest block bottom allowed once scaled
const FIT_TARGET: f64 = 5.5;
const MAX_FIT_ROUNDS: usize = 8;

const CONTENT_X: f64 = 0.5;
const CONTENT_WIDTH: f64 = 9.0;
const COLUMN_WIDTH: f64 = 4.5;
/// Column start beside a left float
const COLUMN_X: f64 = 5.0;

const BULLET_X: f64 = 0.7;
const BULLET_WIDTH: f64 = 8.5;
const BULLET_COLUMN_WIDTH: f64 = 4.2;
const BULLET_COLUMN_X: f64 = 5.2;

const SIDE_IMAGE_MAX_WIDTH: f64 = 4.2;
const RIGHT_IMAGE_X: f64 = 5.3;
const RIGHT_EDGE: f64 = 9.5;

const TEXT_GAP: f64 = 0.2;
const BULLET_GAP: f64 = 0.15;
const IMAGE_GAP: f64 = 0.3;
const TABLE_GAP: f64 = 0.3;
const CODE_GAP: f64 = 0.4;

const CODE_FONT: &str = "Consolas";
const CODE_TEXT_COLOR: &str = "#333333";
const CODE_BORDER_COLOR: &str = "#CCCCCC";
const TABLE_FONT_SIZE: f64 = 14.0;
const TABLE_HEADER_FILL: &str = "#E6E6E6";

/// Estimated height in inches of `text` set at `font_size` points in a box `width` inches wide
///
/// ASCII characters are counted at 0.6 em, everything else at 1.1 em; lines
/// are 1.4 em tall. The result never drops below `min_height`.
pub fn estimate_height(text: &str, font_size: f64, width: f64, min_height: f64) -> f64 {
    if width <= 0.0 {
        return 0.5;
    }
    let em = font_size / 72.0;
    let total: f64 = text
        .chars()
        .map(|c| if c.is_ascii() { 0.6 * em } else { 1.1 * em })
        .sum();
    let lines = (total / width).ceil().max(1.0);
    (lines * 1.4 * em).max(min_height)
}

/// Where a walk over a slide ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Final cursor, including the trailing gap
    pub cursor: f64,
    /// Lowest bottom edge of anything placed
    pub max_bottom: f64,
}

impl Placement {
    /// Vertical extent of the slide
    pub fn extent(&self) -> f64 {
        self.cursor.max(self.max_bottom)
    }
}

/// What a walk does with the geometry it computes
pub enum Pass<'p> {
    /// Compute geometry only
    Measure,
    /// Emit objects, optionally starting continuation slides on overflow
    Render {
        slide: Option<SlideBuilder<'p>>,
        paginate: bool,
        background: String,
    },
}

#[derive(Debug, Clone, Copy)]
struct SideFloat {
    side: Float,
    y: f64,
    h: f64,
}

impl SideFloat {
    fn bottom(&self) -> f64 {
        self.y + self.h
    }
}

/// Floating images first, everything else after, both in document order
pub fn hoist_floats(blocks: &[Block]) -> Vec<&Block> {
    let (floats, flow): (Vec<&Block>, Vec<&Block>) = blocks.iter().partition(|b| b.is_float());
    floats.into_iter().chain(flow).collect()
}

/// Walk one slide at `scale`, measuring or emitting depending on `pass`
pub fn place_blocks(slide: &HtmlSlide, opts: &HtmlOptions, scale: f64, pass: Pass<'_>) -> Placement {
    let scale = if scale > 0.0 { scale } else { 1.0 };
    let mut flow = Flow {
        opts,
        scale,
        y: TOP * scale,
        side: None,
        max_bottom: 0.0,
        pass,
    };

    if !slide.title.is_empty() {
        flow.place_title(slide);
    }
    for block in hoist_floats(&slide.blocks) {
        flow.place_block(block);
    }

    Placement {
        cursor: flow.y,
        max_bottom: flow.max_bottom,
    }
}

/// Measure a slide without emitting anything
pub fn measure(slide: &HtmlSlide, opts: &HtmlOptions, scale: f64) -> Placement {
    place_blocks(slide, opts, scale, Pass::Measure)
}

/// Scale to render `slide` at, or `None` when it must paginate at full size
pub fn fit_scale(slide: &HtmlSlide, opts: &HtmlOptions) -> Option<f64> {
    let natural = measure(slide, opts, 1.0);
    if natural.extent() <= FIT_TRIGGER {
        return Some(1.0);
    }
    if !opts.auto_scale {
        return None;
    }

    let mut scale = FIT_TARGET / natural.extent();
    for _ in 0..MAX_FIT_ROUNDS {
        if scale < opts.min_scale {
            log::debug!(
                "Slide '{}' needs scale {:.3} below minimum {}, paginating",
                slide.title,
                scale,
                opts.min_scale
            );
            return None;
        }
        let placed = measure(slide, opts, scale);
        if placed.max_bottom <= FIT_TARGET {
            log::debug!(
                "Slide '{}' scaled to {:.3} (natural height {:.2}in)",
                slide.title,
                scale,
                natural.extent()
            );
            return Some(scale);
        }
        scale *= FIT_TARGET / placed.max_bottom;
    }
    None
}

/// Lay out every slide into `pres`
pub fn render_slides(slides: &[HtmlSlide], opts: &HtmlOptions, pres: &mut Presentation) {
    for html_slide in slides {
        let (scale, paginate) = match fit_scale(html_slide, opts) {
            Some(scale) => (scale, false),
            None => (1.0, true),
        };

        let background = html_slide
            .background
            .clone()
            .filter(|bg| !bg.trim().is_empty())
            .unwrap_or_else(|| opts.slide_background.clone());

        let mut slide = pres.add_slide();
        set_background(&mut slide, &background);
        place_blocks(
            html_slide,
            opts,
            scale,
            Pass::Render {
                slide: Some(slide),
                paginate,
                background,
            },
        );
    }
}

fn set_background(slide: &mut SlideBuilder<'_>, color: &str) {
    if !color.trim().is_empty() {
        slide.set_background(BackgroundOptions {
            color: color.to_string(),
            ..Default::default()
        });
    }
}

/// Cursor state for one walk
struct Flow<'o, 'p> {
    opts: &'o HtmlOptions,
    scale: f64,
    y: f64,
    side: Option<SideFloat>,
    max_bottom: f64,
    pass: Pass<'p>,
}

impl Flow<'_, '_> {
    fn s(&self, inches: f64) -> f64 {
        inches * self.scale
    }

    fn track(&mut self, y: f64, h: f64) {
        self.max_bottom = self.max_bottom.max(y + h);
    }

    fn advance_to(&mut self, y: f64) {
        self.y = self.y.max(y);
    }

    fn clear_passed_float(&mut self) {
        if self.side.is_some_and(|side| self.y > side.bottom()) {
            self.side = None;
        }
    }

    /// Start a continuation slide when `h` more inches would overflow
    fn paginate(&mut self, h: f64) -> bool {
        let top = self.s(TOP);
        let Pass::Render {
            slide,
            paginate: true,
            background,
        } = &mut self.pass
        else {
            return false;
        };
        if self.y + h <= PAGE_BOTTOM || self.y <= top {
            return false;
        }

        if let Some(current) = slide.take() {
            let mut next = current.next_slide();
            set_background(&mut next, background);
            log::debug!("Content overflow, continuing on slide {}", next.number());
            *slide = Some(next);
        }
        self.y = top;
        self.side = None;
        true
    }

    fn emit(&mut self, f: impl FnOnce(&mut SlideBuilder<'_>)) {
        if let Pass::Render {
            slide: Some(slide), ..
        } = &mut self.pass
        {
            f(slide);
        }
    }

    /// Text column `(x, width)` for the current float state
    fn column(&self, left: Option<f64>) -> (f64, f64) {
        let (mut x, mut width) = (CONTENT_X, CONTENT_WIDTH);
        if let (Some(side), None) = (self.side, left) {
            width = COLUMN_WIDTH;
            x = match side.side {
                Float::Left => COLUMN_X,
                Float::Right => CONTENT_X,
            };
        }
        (left.unwrap_or(x), width)
    }

    fn place_title(&mut self, slide: &HtmlSlide) {
        let y = self.y;
        let h = self.s(TITLE_HEIGHT);
        let options = TextOptions {
            x: CONTENT_X,
            y,
            width: CONTENT_WIDTH,
            height: h,
            font_size: self.opts.title_font_size * self.scale,
            font_color: slide
                .title_color
                .clone()
                .unwrap_or_else(|| self.opts.title_color.clone()),
            bold: true,
            fill: slide.title_background.clone().unwrap_or_default(),
            align: slide.title_align,
            ..Default::default()
        };
        self.emit(|s| {
            s.add_text(slide.title.as_str(), options);
        });
        self.track(y, h);
        self.y += self.s(TITLE_ADVANCE);
    }

    fn place_block(&mut self, block: &Block) {
        let opts = self.opts;
        self.clear_passed_float();
        match &block.kind {
            BlockKind::Heading { level, text } => {
                let size = block
                    .style
                    .font_size
                    .unwrap_or_else(|| heading_size(opts, *level));
                let color = block.style.color.as_deref().unwrap_or(&opts.heading_color);
                self.place_text(block, text, size, color.to_string(), true);
            }
            BlockKind::Text { text } => {
                let size = block.style.font_size.unwrap_or(opts.body_font_size);
                let color = block.style.color.as_deref().unwrap_or(&opts.body_color);
                self.place_text(block, text, size, color.to_string(), false);
            }
            BlockKind::Bullets { lines } => self.place_bullets(block, lines),
            BlockKind::Code { text } => self.place_code(text),
            BlockKind::Image(image) => self.place_image(block, image),
            BlockKind::Table { rows } => self.place_table(block, rows),
        }
    }

    fn place_text(&mut self, block: &Block, text: &str, size: f64, color: String, bold: bool) {
        let size = size * self.scale;
        let (mut x, mut width) = self.column(block.style.left);
        let mut h = estimate_height(text, size, width, self.s(0.4));

        if block.style.top.is_none() && self.paginate(h) {
            (x, width) = self.column(block.style.left);
            h = estimate_height(text, size, width, self.s(0.4));
        }
        let y = block.style.top.map_or(self.y, |top| self.s(top));

        let options = TextOptions {
            x,
            y,
            width,
            height: h,
            font_size: size,
            font_color: color,
            bold,
            fill: block.style.background.clone().unwrap_or_default(),
            align: block.style.align,
            ..Default::default()
        };
        self.emit(|s| {
            s.add_text(text, options);
        });
        self.track(y, h);
        self.advance_to(y + h + self.s(TEXT_GAP));
    }

    fn place_bullets(&mut self, block: &Block, lines: &[BulletLine]) {
        let opts = self.opts;
        let size = opts.body_font_size * self.scale;
        for line in lines {
            self.clear_passed_float();
            let text = format!("\u{2022} {}", line.text);
            let color = line
                .color
                .as_deref()
                .or(block.style.color.as_deref())
                .unwrap_or(&opts.body_color)
                .to_string();

            let (mut x, mut width) = self.bullet_column();
            let mut h = estimate_height(&text, size, width, self.s(0.4));
            if self.paginate(h) {
                (x, width) = self.bullet_column();
                h = estimate_height(&text, size, width, self.s(0.4));
            }

            let y = self.y;
            let options = TextOptions {
                x,
                y,
                width,
                height: h,
                font_size: size,
                font_color: color,
                ..Default::default()
            };
            self.emit(|s| {
                s.add_text(text, options);
            });
            self.track(y, h);
            self.y += h + self.s(BULLET_GAP);
        }
    }

    fn bullet_column(&self) -> (f64, f64) {
        match self.side.map(|side| side.side) {
            Some(Float::Left) => (BULLET_COLUMN_X, BULLET_COLUMN_WIDTH),
            Some(Float::Right) => (BULLET_X, BULLET_COLUMN_WIDTH),
            None => (BULLET_X, BULLET_WIDTH),
        }
    }

    fn place_code(&mut self, text: &str) {
        let lines = text.split('\n').count() as f64;
        let h = self.s((lines * 0.35).clamp(0.5, 3.5));
        let pad = self.s(0.1);
        self.paginate(h + 2.0 * pad);

        let y = self.y;
        let frame = ShapeOptions {
            x: CONTENT_X,
            y,
            width: CONTENT_WIDTH,
            height: h + 2.0 * pad,
            fill: self.opts.code_background.clone(),
            line_color: CODE_BORDER_COLOR.to_string(),
            line_width: 1.0,
            ..Default::default()
        };
        let options = TextOptions {
            x: CONTENT_X + 0.1,
            y: y + pad,
            width: CONTENT_WIDTH - 0.2,
            height: h,
            font_face: CODE_FONT.to_string(),
            font_size: self.opts.code_font_size * self.scale,
            font_color: CODE_TEXT_COLOR.to_string(),
            ..Default::default()
        };
        self.emit(|s| {
            s.add_shape(ShapeType::Rect, frame).add_text(text, options);
        });
        self.track(y, h + 2.0 * pad);
        self.y += h + self.s(CODE_GAP);
    }

    fn place_image(&mut self, block: &Block, image: &ImageBlock) {
        let top = block.style.top.map(|t| self.s(t));

        // A second float starts below the first
        if image.float.is_some() && top.is_none() {
            if let Some(side) = self.side.take() {
                self.advance_to(side.bottom() + self.s(0.2));
            }
        }

        let (mut w, mut h) = natural_image_size(image);
        w *= self.scale;
        h *= self.scale;

        if top.is_none() {
            self.paginate(h);
        }

        let mut x = match image.float {
            Some(Float::Left) => CONTENT_X,
            Some(Float::Right) => RIGHT_IMAGE_X,
            None => (SLIDE_WIDTH_IN - w) / 2.0,
        };
        let y = top.unwrap_or(self.y);
        if let Some(left) = block.style.left {
            x = left;
        }

        // Keep the right edge inside the margin
        if x + w > RIGHT_EDGE {
            if RIGHT_EDGE - w > CONTENT_X {
                x = RIGHT_EDGE - w;
            } else {
                let new_w = (RIGHT_EDGE - x).max(1.0);
                h *= new_w / w;
                w = new_w;
            }
        }

        // Absolutely placed images shrink to stay on the page
        if let Some(top) = top {
            let bottom = self.s(PAGE_BOTTOM);
            let available = bottom - top;
            if top + h > bottom && available > 1.0 {
                w *= available / h;
                h = available;
            }
        }

        let rounding = match image.border_radius.unwrap_or(self.opts.image_rounding) {
            r if r > 0.0 => r * self.scale,
            r => r,
        };
        let options = ImageOptions {
            x,
            y,
            width: w,
            height: h,
            format: image.format.clone(),
            alt_text: image.alt.clone(),
            rounding,
            ..Default::default()
        };
        self.emit(|s| {
            s.add_image(ImageOptions {
                data: image.data.clone(),
                ..options
            });
        });
        self.track(y, h);

        match image.float {
            Some(side) => {
                self.side = Some(SideFloat { side, y, h });
            }
            None => {
                self.side = None;
                self.advance_to(y + h + self.s(IMAGE_GAP));
            }
        }
    }

    fn place_table(&mut self, block: &Block, rows: &[Vec<String>]) {
        let h = self.s((rows.len() as f64 * 0.4).min(3.0));
        if block.style.top.is_none() {
            self.paginate(h);
        }
        let (x, width) = self.column(block.style.left);
        let y = block.style.top.map_or(self.y, |top| self.s(top));

        let cells: Vec<Vec<TableCell>> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .map(|text| {
                        let cell = TableCell::new(text.as_str());
                        if i == 0 {
                            cell.bold()
                        } else {
                            cell
                        }
                    })
                    .collect()
            })
            .collect();

        let options = TableOptions {
            x,
            y,
            width,
            row_heights: vec![h / rows.len().max(1) as f64; rows.len()],
            font_size: TABLE_FONT_SIZE * self.scale,
            first_row_bold: true,
            first_row_fill: TABLE_HEADER_FILL.to_string(),
            ..Default::default()
        };
        self.emit(|s| {
            s.add_table(cells, options);
        });
        self.track(y, h);
        self.advance_to(y + h + self.s(TABLE_GAP));
    }
}

/// Default heading size for `level`, derived from the configured heading size
///
/// With the default 32 pt this gives h2 28, h3/h4 24 and h5/h6 20.
fn heading_size(opts: &HtmlOptions, level: u8) -> f64 {
    let ratio = match level {
        0..=2 => 28.0,
        3 | 4 => 24.0,
        _ => 20.0,
    } / 32.0;
    opts.heading_font_size * ratio
}

/// Unscaled size in inches before any fitting
fn natural_image_size(image: &ImageBlock) -> (f64, f64) {
    let (mut w, mut h) = match (image.width_px, image.height_px) {
        (Some(w), Some(h)) => (w / PX_PER_INCH, h / PX_PER_INCH),
        _ => (5.0, 2.8),
    };

    match image.float {
        Some(_) if image.width_px.is_none() => (SIDE_IMAGE_MAX_WIDTH, 2.6),
        Some(_) => {
            if w > SIDE_IMAGE_MAX_WIDTH {
                h *= SIDE_IMAGE_MAX_WIDTH / w;
                w = SIDE_IMAGE_MAX_WIDTH;
            }
            (w, h)
        }
        None => {
            if w > 8.0 {
                h *= 8.0 / w;
                w = 8.0;
            }
            if h > 5.0 {
                w *= 5.0 / h;
                h = 5.0;
            }
            (w, h)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;
    use slidekit_pptx::{Background, SlideObject};

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const EPS: f64 = 1e-9;

    fn prepared(html: &str) -> HtmlSlide {
        let mut slides = parse_html(html);
        for block in &mut slides[0].blocks {
            if let BlockKind::Image(image) = &mut block.kind {
                image.data = PNG.to_vec();
                image.format = "png".to_string();
            }
        }
        slides.remove(0)
    }

    fn render(slide: &HtmlSlide, opts: &HtmlOptions) -> Presentation {
        let mut pres = Presentation::new();
        render_slides(std::slice::from_ref(slide), opts, &mut pres);
        pres
    }

    /// (text, x, y, width, font size) of every text box on a slide
    fn text_boxes(pres: &Presentation, index: usize) -> Vec<(String, f64, f64, f64, f64)> {
        pres.slide(index)
            .unwrap()
            .objects()
            .iter()
            .filter_map(|obj| match obj {
                SlideObject::Text(t) => Some((
                    t.text.clone(),
                    t.options.x,
                    t.options.y,
                    t.options.width,
                    t.options.font_size,
                )),
                _ => None,
            })
            .collect()
    }

    fn paragraphs(n: usize) -> String {
        let body: String = (1..=n).map(|i| format!("<p>line {}</p>", i)).collect();
        format!("<h1>Long</h1>{}", body)
    }

    #[test]
    fn test_estimate_height() {
        // One short line at 18pt is below the minimum
        assert_eq!(estimate_height("one", 18.0, 9.0, 0.4), 0.4);
        // 100 ASCII chars at 72pt: 60in of text in 9in boxes -> 7 lines
        let text = "x".repeat(100);
        assert!((estimate_height(&text, 72.0, 9.0, 0.4) - 9.8).abs() < EPS);
        // Wide glyphs: 2 x 1.1in in a 1in box -> 3 lines
        assert!((estimate_height("中文", 72.0, 1.0, 0.4) - 4.2).abs() < EPS);
        assert_eq!(estimate_height("anything", 18.0, 0.0, 0.4), 0.5);
    }

    #[test]
    fn test_heading_sizes() {
        let opts = HtmlOptions::default();
        let sizes: Vec<f64> = (2..=6).map(|level| heading_size(&opts, level)).collect();
        assert_eq!(sizes, vec![28.0, 24.0, 24.0, 20.0, 20.0]);

        let small = HtmlOptions {
            heading_font_size: 16.0,
            ..Default::default()
        };
        assert_eq!(heading_size(&small, 2), 14.0);
    }

    #[test]
    fn test_hoist_floats_is_stable() {
        let slide = prepared(
            r#"<p>a</p><img src="1.png" style="float:left"><p>b</p><img src="2.png"><img src="3.png" style="float:right">"#,
        );
        let order: Vec<String> = hoist_floats(&slide.blocks)
            .iter()
            .map(|b| match &b.kind {
                BlockKind::Image(img) => img.src.clone(),
                BlockKind::Text { text } => text.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(order, vec!["1.png", "3.png", "a", "b", "2.png"]);
    }

    #[test]
    fn test_measure_title_and_paragraphs() {
        let slide = prepared("<h1>T</h1><p>one</p><p>two</p>");
        let placed = measure(&slide, &HtmlOptions::default(), 1.0);
        assert!((placed.cursor - 2.7).abs() < EPS);
        assert!((placed.max_bottom - 2.5).abs() < EPS);
        assert_eq!(fit_scale(&slide, &HtmlOptions::default()), Some(1.0));
    }

    #[test]
    fn test_render_title_and_paragraphs() {
        let slide = prepared(r#"<h1 style="color:#FFF">T</h1><p>one</p><h2>Sub</h2>"#);
        let pres = render(&slide, &HtmlOptions::default());
        let boxes = text_boxes(&pres, 0);
        assert_eq!(boxes.len(), 3);
        assert_eq!(boxes[0], ("T".to_string(), 0.5, 0.5, 9.0, 44.0));
        assert_eq!(boxes[1], ("one".to_string(), 0.5, 1.5, 9.0, 18.0));
        assert_eq!(boxes[2].0, "Sub");
        assert!((boxes[2].2 - 2.1).abs() < EPS);
        assert_eq!(boxes[2].4, 28.0);

        let SlideObject::Text(title) = &pres.slide(0).unwrap().objects()[0] else {
            panic!("expected title");
        };
        assert_eq!(title.options.font_color, "#FFF");
        assert!(title.options.bold);
    }

    #[test]
    fn test_left_float_narrows_following_blocks() {
        let slide = prepared(
            r#"<h1>T</h1><p>before</p><img src="x.png" style="float:left" width="192" height="96"><p>beside</p><p>below</p>"#,
        );
        let pres = render(&slide, &HtmlOptions::default());
        let objects = pres.slide(0).unwrap().objects();

        // Hoisted: the image follows the title
        let SlideObject::Image(image) = &objects[1] else {
            panic!("expected hoisted image");
        };
        assert_eq!((image.options.x, image.options.y), (0.5, 1.5));
        assert_eq!((image.options.width, image.options.height), (2.0, 1.0));

        let boxes = text_boxes(&pres, 0);
        assert_eq!(boxes[1].0, "before");
        assert_eq!((boxes[1].1, boxes[1].3), (5.0, 4.5));
        assert_eq!(boxes[2].0, "beside");
        assert_eq!((boxes[2].1, boxes[2].3), (5.0, 4.5));
        // Cursor passed the image bottom (2.5): full width again
        assert_eq!(boxes[3].0, "below");
        assert_eq!((boxes[3].1, boxes[3].3), (0.5, 9.0));
    }

    #[test]
    fn test_right_float_and_bullets() {
        let slide = prepared(
            r#"<img src="x.png" style="float:right"><ul><li>a</li><li style="color:red">b</li></ul>"#,
        );
        let pres = render(&slide, &HtmlOptions::default());
        let objects = pres.slide(0).unwrap().objects();

        let SlideObject::Image(image) = &objects[0] else {
            panic!("expected image");
        };
        // Float without a width uses the side default
        assert_eq!(
            (image.options.x, image.options.width, image.options.height),
            (5.3, 4.2, 2.6)
        );

        let boxes = text_boxes(&pres, 0);
        assert_eq!(boxes[0].0, "\u{2022} a");
        assert_eq!((boxes[0].1, boxes[0].3), (0.7, 4.2));
        let SlideObject::Text(second) = &objects[2] else {
            panic!("expected bullet");
        };
        assert_eq!(second.options.font_color, "red");
    }

    #[test]
    fn test_centered_image_geometry() {
        let slide = prepared(r#"<img src="a.png" width="480" height="192"><img src="b.png" width="1152" height="288">"#);
        let pres = render(&slide, &HtmlOptions::default());
        let images: Vec<(f64, f64, f64, f64)> = pres
            .slide(0)
            .unwrap()
            .objects()
            .iter()
            .filter_map(|obj| match obj {
                SlideObject::Image(i) => {
                    Some((i.options.x, i.options.y, i.options.width, i.options.height))
                }
                _ => None,
            })
            .collect();
        assert_eq!(images[0], (2.5, 0.5, 5.0, 2.0));
        // 12in wide is capped to 8in, keeping the ratio
        let (x, y, w, h) = images[1];
        assert!((x - 1.0).abs() < EPS && (w - 8.0).abs() < EPS && (h - 2.0).abs() < EPS);
        assert!((y - 2.8).abs() < EPS);
    }

    #[test]
    fn test_image_overflow_corrections() {
        let slide = prepared(
            r#"<img src="a.png" width="192" height="96" style="left: 8in; top: 1in"><img src="b.png" width="480" height="480" style="top: 3in">"#,
        );
        let pres = render(&slide, &HtmlOptions::default());
        let objects = pres.slide(0).unwrap().objects();

        let SlideObject::Image(shifted) = &objects[0] else {
            panic!("expected image");
        };
        assert_eq!((shifted.options.x, shifted.options.y), (7.5, 1.0));

        let SlideObject::Image(shrunk) = &objects[1] else {
            panic!("expected image");
        };
        assert_eq!(shrunk.options.y, 3.0);
        assert!((shrunk.options.height - 2.2).abs() < EPS);
        assert!((shrunk.options.width - 2.2).abs() < EPS);
    }

    #[test]
    fn test_code_block() {
        let slide = prepared("<pre>a\nb\nc</pre><p>after</p>");
        let pres = render(&slide, &HtmlOptions::default());
        let objects = pres.slide(0).unwrap().objects();

        let SlideObject::Shape(frame) = &objects[0] else {
            panic!("expected code frame");
        };
        assert!((frame.options.height - 1.25).abs() < EPS);
        assert_eq!(frame.options.line_color, "#CCCCCC");

        let SlideObject::Text(code) = &objects[1] else {
            panic!("expected code text");
        };
        assert_eq!(code.options.font_face, "Consolas");
        assert_eq!(code.options.font_size, 14.0);
        assert!((code.options.y - 0.6).abs() < EPS);

        let boxes = text_boxes(&pres, 0);
        assert!((boxes[1].2 - 1.95).abs() < EPS);
    }

    #[test]
    fn test_table_block() {
        let slide = prepared("<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>");
        let pres = render(&slide, &HtmlOptions::default());
        let SlideObject::Table(table) = &pres.slide(0).unwrap().objects()[0] else {
            panic!("expected table");
        };
        assert!(table.rows[0][0].bold);
        assert!(!table.rows[1][0].bold);
        assert_eq!(table.options.first_row_fill, "#E6E6E6");
        assert_eq!(table.options.row_heights.len(), 2);
        assert!((table.options.row_heights.iter().sum::<f64>() - 0.8).abs() < EPS);
        assert_eq!(table.options.width, 9.0);
    }

    #[test]
    fn test_auto_scale_fits_every_block() {
        let slide = prepared(&paragraphs(8));
        let opts = HtmlOptions::default();
        assert!(measure(&slide, &opts, 1.0).extent() > 5.6);

        let scale = fit_scale(&slide, &opts).unwrap();
        assert!(scale < 1.0 && scale >= opts.min_scale);
        assert!(measure(&slide, &opts, scale).max_bottom <= 5.5);

        let pres = render(&slide, &opts);
        assert_eq!(pres.slide_count(), 1);
        let boxes = text_boxes(&pres, 0);
        assert_eq!(boxes.len(), 9);
        assert!((boxes[1].4 - 18.0 * scale).abs() < EPS);
        // Widths are not scaled
        assert_eq!(boxes[1].3, 9.0);
    }

    #[test]
    fn test_paginates_below_min_scale() {
        let slide = prepared(&paragraphs(20));
        let opts = HtmlOptions {
            slide_background: "#FAFAFA".to_string(),
            ..Default::default()
        };
        assert_eq!(fit_scale(&slide, &opts), None);

        let pres = render(&slide, &opts);
        assert_eq!(pres.slide_count(), 3);
        assert_eq!(text_boxes(&pres, 0).len(), 7);
        assert_eq!(text_boxes(&pres, 1).len(), 8);
        assert_eq!(text_boxes(&pres, 2).len(), 6);
        // Continuation slides start at the top and keep the background
        assert_eq!(text_boxes(&pres, 1)[0].2, 0.5);
        assert_eq!(
            pres.slide(2).unwrap().background(),
            Some(&Background::Color("FAFAFA".to_string()))
        );
    }

    #[test]
    fn test_auto_scale_disabled_paginates() {
        let slide = prepared(&paragraphs(8));
        let opts = HtmlOptions {
            auto_scale: false,
            ..Default::default()
        };
        assert_eq!(fit_scale(&slide, &opts), None);
        let pres = render(&slide, &opts);
        assert_eq!(pres.slide_count(), 2);
        assert_eq!(text_boxes(&pres, 1).len(), 2);
    }
}
