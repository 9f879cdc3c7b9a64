//! Slides and the builder that populates them.
//!
//! A [`Slide`] never points back at its presentation. Objects that need the
//! shared media pool or the chart counter are added through a
//! [`SlideBuilder`], which borrows the [`Presentation`] mutably for as long as
//! the slide is being built.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::chart::{ChartOptions, ChartSeries, ChartType};
use crate::color::normalize_color;
use crate::constants::{CHART_REL_OFFSET, MEDIA_EMBED_REL_OFFSET};
use crate::media::{
    audio_ext_from_path, audio_type, ext_from_path, image_type, video_ext_from_path, video_type,
};
use crate::model::{
    Align, AudioObject, AudioOptions, Background, BackgroundOptions, ChartObject, ImageObject,
    ImageOptions, MediaRef, ShapeObject, ShapeOptions, ShapeType, SlideLayout, SlideObject,
    TableCell, TableObject, TableOptions, TextObject, TextOptions, VerticalAlign, VideoObject,
    VideoOptions,
    DEFAULT_FONT_COLOR, DEFAULT_FONT_FACE, DEFAULT_FONT_SIZE,
};
use crate::presentation::{MediaKind, Presentation};

/// Default shape fill (Office blue)
const DEFAULT_SHAPE_FILL: &str = "4472C4";

/// Default shape outline
const DEFAULT_SHAPE_LINE: &str = "2F5496";

/// Default table font size, in points
const DEFAULT_TABLE_FONT_SIZE: f64 = 14.0;

/// Default table border color
const DEFAULT_TABLE_BORDER: &str = "CCCCCC";

/// A single slide
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    objects: Vec<SlideObject>,
    background: Option<Background>,
    notes: Option<String>,
    layout: SlideLayout,
    number: usize,
    /// Relationship ids taken in this slide's rels part; `rId1` is the layout
    rel_ids: BTreeSet<usize>,
}

impl Slide {
    pub(crate) fn new(number: usize, layout: SlideLayout) -> Self {
        Self {
            objects: Vec::new(),
            background: None,
            notes: None,
            layout,
            number,
            rel_ids: BTreeSet::from([1]),
        }
    }

    /// Reserve `rId{preferred}`, or the next free id above it
    fn claim_rel_id(&mut self, preferred: usize) -> String {
        let mut id = preferred.max(2);
        while !self.rel_ids.insert(id) {
            id += 1;
        }
        if id != preferred {
            log::debug!(
                "Slide {}: rId{} taken, using rId{}",
                self.number,
                preferred,
                id
            );
        }
        format!("rId{}", id)
    }

    /// Objects in insertion (and z-) order
    pub fn objects(&self) -> &[SlideObject] {
        &self.objects
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    /// Speaker notes
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn layout(&self) -> SlideLayout {
        self.layout
    }

    /// 1-based position in the presentation
    pub fn number(&self) -> usize {
        self.number
    }

    /// Whether any media object requests playback on slide entry
    pub fn has_auto_play(&self) -> bool {
        self.objects.iter().any(SlideObject::auto_plays)
    }

    /// Charts on this slide, in order
    pub fn charts(&self) -> impl Iterator<Item = &ChartObject> {
        self.objects.iter().filter_map(|obj| match obj {
            SlideObject::Chart(chart) => Some(chart),
            _ => None,
        })
    }
}

/// Mutable handle on one slide of a presentation
///
/// ```
/// use slidekit_pptx::{Presentation, ShapeOptions, ShapeType, TextOptions};
///
/// let mut pres = Presentation::new();
/// pres.add_slide()
///     .add_text("Title", TextOptions { font_size: 32.0, ..Default::default() })
///     .add_shape(ShapeType::Ellipse, ShapeOptions::default());
/// assert_eq!(pres.slide(0).unwrap().objects().len(), 2);
/// ```
#[derive(Debug)]
pub struct SlideBuilder<'a> {
    pres: &'a mut Presentation,
    index: usize,
}

impl<'a> SlideBuilder<'a> {
    pub(crate) fn new(pres: &'a mut Presentation, index: usize) -> Self {
        Self { pres, index }
    }

    /// The slide being built
    pub fn slide(&self) -> &Slide {
        &self.pres.slides()[self.index]
    }

    /// 1-based slide number
    pub fn number(&self) -> usize {
        self.index + 1
    }

    /// Finish this slide and continue on a newly appended one
    pub fn next_slide(self) -> SlideBuilder<'a> {
        let pres = self.pres;
        pres.add_slide()
    }

    fn slide_mut(&mut self) -> &mut Slide {
        self.pres.slide_at_mut(self.index)
    }

    /// Add bytes to the media pool and reserve this slide's relationship ids for them
    fn attach_media(&mut self, kind: MediaKind, data: Vec<u8>, ext: &str) -> MediaRef {
        let mut media = self.pres.push_media(kind, data, ext);
        let slide = self.slide_mut();
        media.rel_id = slide.claim_rel_id(media.index + kind.rel_offset());
        if matches!(kind, MediaKind::Video | MediaKind::Audio) {
            media.embed_rel_id = slide.claim_rel_id(media.index + MEDIA_EMBED_REL_OFFSET);
        }
        media
    }

    fn push(&mut self, object: SlideObject) -> &mut Self {
        log::debug!(
            "Slide {}: added {} object",
            self.index + 1,
            object.kind()
        );
        self.slide_mut().objects.push(object);
        self
    }

    /// Add a text box; `\n` starts a new paragraph
    pub fn add_text(&mut self, text: impl Into<String>, mut options: TextOptions) -> &mut Self {
        if options.font_face.is_empty() {
            options.font_face = DEFAULT_FONT_FACE.to_string();
        }
        if options.font_size == 0.0 {
            options.font_size = DEFAULT_FONT_SIZE;
        }
        if options.font_color.is_empty() {
            options.font_color = DEFAULT_FONT_COLOR.to_string();
        }
        options.align.get_or_insert(Align::Left);
        options.valign.get_or_insert(VerticalAlign::Top);

        self.push(SlideObject::Text(TextObject {
            text: text.into(),
            options,
        }))
    }

    /// Add a preset shape
    pub fn add_shape(&mut self, shape_type: ShapeType, options: ShapeOptions) -> &mut Self {
        self.push_shape(shape_type, options, None)
    }

    /// Add a preset shape with centered white text
    pub fn add_shape_with_text(
        &mut self,
        shape_type: ShapeType,
        text: impl Into<String>,
        options: ShapeOptions,
    ) -> &mut Self {
        self.push_shape(shape_type, options, Some(text.into()))
    }

    fn push_shape(
        &mut self,
        shape_type: ShapeType,
        mut options: ShapeOptions,
        text: Option<String>,
    ) -> &mut Self {
        if options.fill.is_empty() {
            options.fill = DEFAULT_SHAPE_FILL.to_string();
        }
        if options.line_width == 0.0 {
            options.line_width = 1.0;
        }
        if options.line_color.is_empty() {
            options.line_color = DEFAULT_SHAPE_LINE.to_string();
        }

        self.push(SlideObject::Shape(ShapeObject {
            shape_type,
            options,
            text: text.filter(|t| !t.is_empty()),
        }))
    }

    /// Add a table; rows may be ragged, the widest row sets the grid
    pub fn add_table(&mut self, rows: Vec<Vec<TableCell>>, mut options: TableOptions) -> &mut Self {
        if options.font_face.is_empty() {
            options.font_face = DEFAULT_FONT_FACE.to_string();
        }
        if options.font_size == 0.0 {
            options.font_size = DEFAULT_TABLE_FONT_SIZE;
        }
        if options.font_color.is_empty() {
            options.font_color = DEFAULT_FONT_COLOR.to_string();
        }
        if options.border.width == 0.0 {
            options.border.width = 1.0;
        }
        if options.border.color.is_empty() {
            options.border.color = DEFAULT_TABLE_BORDER.to_string();
        }

        self.push(SlideObject::Table(TableObject { rows, options }))
    }

    /// Embed a picture from `options.path` or `options.data`
    ///
    /// Unreadable or empty input leaves the slide unchanged.
    pub fn add_image(&mut self, mut options: ImageOptions) -> &mut Self {
        let data = std::mem::take(&mut options.data);
        let Some((data, path_ext)) = load_media(options.path.as_deref(), data, "image") else {
            return self;
        };

        let format = options.format.trim().to_ascii_lowercase();
        let hint = path_ext.or_else(|| (!format.is_empty()).then_some(format));
        let ext = image_ext(hint, &data);
        let media = self.attach_media(MediaKind::Image, data, &ext);
        self.push(SlideObject::Image(ImageObject { options, media }))
    }

    /// Add a chart backed by its own chart part
    pub fn add_chart(
        &mut self,
        chart_type: ChartType,
        series: Vec<ChartSeries>,
        mut options: ChartOptions,
    ) -> &mut Self {
        options.apply_defaults();
        let index = self.pres.next_chart_index();
        let rel_id = self.slide_mut().claim_rel_id(index + CHART_REL_OFFSET);
        self.push(SlideObject::Chart(ChartObject {
            chart_type,
            series,
            options,
            index,
            rel_id,
        }))
    }

    /// Clustered bar chart with one series per `(name, values)` pair
    pub fn add_bar_chart(
        &mut self,
        title: &str,
        labels: &[&str],
        data: &[(&str, Vec<f64>)],
        options: ChartOptions,
    ) -> &mut Self {
        self.add_titled_chart(ChartType::Bar, title, labels, data, options)
    }

    /// Line chart with one series per `(name, values)` pair
    pub fn add_line_chart(
        &mut self,
        title: &str,
        labels: &[&str],
        data: &[(&str, Vec<f64>)],
        options: ChartOptions,
    ) -> &mut Self {
        self.add_titled_chart(ChartType::Line, title, labels, data, options)
    }

    /// Pie chart of a single series named after the title
    pub fn add_pie_chart(
        &mut self,
        title: &str,
        labels: &[&str],
        values: Vec<f64>,
        options: ChartOptions,
    ) -> &mut Self {
        self.add_titled_chart(ChartType::Pie, title, labels, &[(title, values)], options)
    }

    fn add_titled_chart(
        &mut self,
        chart_type: ChartType,
        title: &str,
        labels: &[&str],
        data: &[(&str, Vec<f64>)],
        mut options: ChartOptions,
    ) -> &mut Self {
        let series = data
            .iter()
            .map(|(name, values)| ChartSeries::new(*name, labels.iter().copied(), values.clone()))
            .collect();
        options.title = title.to_string();
        options.show_title = true;
        self.add_chart(chart_type, series, options)
    }

    /// Embed a video, with an optional poster frame
    pub fn add_video(&mut self, mut options: VideoOptions) -> &mut Self {
        let data = std::mem::take(&mut options.data);
        let Some((data, path_ext)) = load_media(options.path.as_deref(), data, "video") else {
            return self;
        };

        let ext = match path_ext {
            Some(_) => options
                .path
                .as_deref()
                .map(|p| video_ext_from_path(&p.to_string_lossy()))
                .unwrap_or_default(),
            None => video_type(&data).to_string(),
        };
        let ext = if ext.is_empty() { "mp4".to_string() } else { ext };

        if options.width == 0.0 {
            options.width = 6.0;
        }
        if options.height == 0.0 {
            options.height = 4.0;
        }

        let media = self.attach_media(MediaKind::Video, data, &ext);

        let poster_data = std::mem::take(&mut options.poster_data);
        let poster = if options.poster_path.is_some() || !poster_data.is_empty() {
            load_media(options.poster_path.as_deref(), poster_data, "poster").map(
                |(data, path_ext)| {
                    let ext = image_ext(path_ext, &data);
                    self.attach_media(MediaKind::Poster, data, &ext)
                },
            )
        } else {
            None
        };

        self.push(SlideObject::Video(VideoObject {
            options,
            media,
            poster,
        }))
    }

    /// Embed an audio clip
    pub fn add_audio(&mut self, mut options: AudioOptions) -> &mut Self {
        let data = std::mem::take(&mut options.data);
        let Some((data, path_ext)) = load_media(options.path.as_deref(), data, "audio") else {
            return self;
        };

        let ext = match path_ext {
            Some(_) => options
                .path
                .as_deref()
                .map(|p| audio_ext_from_path(&p.to_string_lossy()))
                .unwrap_or_default(),
            None => audio_type(&data).to_string(),
        };
        let ext = if ext.is_empty() { "mp3".to_string() } else { ext };

        if options.width == 0.0 {
            options.width = 0.5;
        }
        if options.height == 0.0 {
            options.height = 0.5;
        }

        let media = self.attach_media(MediaKind::Audio, data, &ext);
        self.push(SlideObject::Audio(AudioObject { options, media }))
    }

    /// Set a solid or picture background; a picture wins over a color
    pub fn set_background(&mut self, mut options: BackgroundOptions) -> &mut Self {
        let data = std::mem::take(&mut options.data);
        if options.image.is_some() || !data.is_empty() {
            if let Some((data, path_ext)) =
                load_media(options.image.as_deref(), data, "background")
            {
                let ext = image_ext(path_ext, &data);
                let media = self.attach_media(MediaKind::Image, data, &ext);
                self.slide_mut().background = Some(Background::Image(media));
                return self;
            }
        }

        if !options.color.trim().is_empty() {
            self.slide_mut().background = Some(Background::Color(normalize_color(&options.color)));
        }
        self
    }

    /// Attach speaker notes
    pub fn set_notes(&mut self, notes: impl Into<String>) -> &mut Self {
        self.slide_mut().notes = Some(notes.into());
        self
    }

    pub fn set_layout(&mut self, layout: SlideLayout) -> &mut Self {
        self.slide_mut().layout = layout;
        self
    }
}

/// Read media bytes from a path, or take the supplied buffer.
///
/// Returns the bytes plus the extension found in the path, if a path was
/// used. `None` means the object should be skipped.
fn load_media(path: Option<&Path>, data: Vec<u8>, what: &str) -> Option<(Vec<u8>, Option<String>)> {
    if let Some(path) = path {
        return match fs::read(path) {
            Ok(bytes) if !bytes.is_empty() => {
                Some((bytes, Some(ext_from_path(&path.to_string_lossy()))))
            }
            Ok(_) => {
                log::warn!("Skipping {}: {} is empty", what, path.display());
                None
            }
            Err(e) => {
                log::warn!("Skipping {}: cannot read {}: {}", what, path.display(), e);
                None
            }
        };
    }

    if data.is_empty() {
        log::debug!("Skipping {} without path or data", what);
        return None;
    }
    Some((data, None))
}

/// Image extension: the path's when it has one, else sniffed, else png
fn image_ext(path_ext: Option<String>, data: &[u8]) -> String {
    match path_ext.filter(|ext| !ext.is_empty()) {
        Some(ext) => ext,
        None => match image_type(data) {
            "" => "png".to_string(),
            sniffed => sniffed.to_string(),
        },
    }
}
