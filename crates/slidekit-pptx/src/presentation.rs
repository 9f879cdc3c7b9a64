//! The presentation root: metadata, canvas, slides and the shared media pool.

use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    AUDIO_REL_OFFSET, DEFAULT_SLIDE_HEIGHT_EMU, DEFAULT_SLIDE_WIDTH_EMU, IMAGE_REL_OFFSET,
    SLIDE_HEIGHT_16X10_EMU, SLIDE_HEIGHT_4X3_EMU, VIDEO_REL_OFFSET,
};
use crate::error::{PptxError, Result};
use crate::model::{MediaRef, SlideLayout};
use crate::slide::{Slide, SlideBuilder};
use crate::units::inch_to_emu;
use crate::writer::PptxWriter;

/// Document metadata written to `docProps/core.xml` and `docProps/app.xml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentProperties {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub company: String,
}

/// Kind of a media pool entry; decides the part name prefix and rel id range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Poster,
    Audio,
}

impl MediaKind {
    /// File name prefix under `ppt/media/`
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Poster => "poster",
            Self::Audio => "audio",
        }
    }

    /// Offset added to the pool index to form the relationship id
    pub fn rel_offset(&self) -> usize {
        match self {
            Self::Image => IMAGE_REL_OFFSET,
            Self::Video | Self::Poster => VIDEO_REL_OFFSET,
            Self::Audio => AUDIO_REL_OFFSET,
        }
    }
}

/// One binary part in `ppt/media/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEntry {
    pub kind: MediaKind,

    /// 1-based position in the pool
    pub index: usize,

    /// Lowercase extension without the dot
    pub ext: String,

    /// Preferred relationship id; a slide that already uses it assigns the next free one
    pub rel_id: String,

    pub data: Vec<u8>,
}

impl MediaEntry {
    /// File name under `ppt/media/` (e.g. `image1.png`)
    pub fn file_name(&self) -> String {
        format!("{}{}.{}", self.kind.prefix(), self.index, self.ext)
    }

    /// Full part name inside the package
    pub fn part_name(&self) -> String {
        format!("ppt/media/{}", self.file_name())
    }

    /// Reference stored on slide objects
    pub fn media_ref(&self) -> MediaRef {
        MediaRef {
            rel_id: self.rel_id.clone(),
            embed_rel_id: String::new(),
            file_name: self.file_name(),
            index: self.index,
        }
    }
}

/// An in-memory presentation.
///
/// Slides, media and charts are append-only; writing is a pure read of the
/// tree, so the same presentation can be serialized any number of times.
#[derive(Debug, Clone)]
pub struct Presentation {
    properties: DocumentProperties,
    slide_width: i64,
    slide_height: i64,
    layout: SlideLayout,
    slides: Vec<Slide>,
    media: Vec<MediaEntry>,
    chart_count: usize,
    timestamp: Option<String>,
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new()
    }
}

impl Presentation {
    /// Create an empty 16:9 presentation
    pub fn new() -> Self {
        Self {
            properties: DocumentProperties::default(),
            slide_width: DEFAULT_SLIDE_WIDTH_EMU,
            slide_height: DEFAULT_SLIDE_HEIGHT_EMU,
            layout: SlideLayout::Blank,
            slides: Vec::new(),
            media: Vec::new(),
            chart_count: 0,
            timestamp: None,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.properties.title = title.into();
        self
    }

    pub fn set_author(&mut self, author: impl Into<String>) -> &mut Self {
        self.properties.author = author.into();
        self
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) -> &mut Self {
        self.properties.subject = subject.into();
        self
    }

    pub fn set_company(&mut self, company: impl Into<String>) -> &mut Self {
        self.properties.company = company.into();
        self
    }

    /// Replace all document metadata at once
    pub fn set_properties(&mut self, properties: DocumentProperties) -> &mut Self {
        self.properties = properties;
        self
    }

    /// Layout tag given to slides added afterwards
    pub fn set_layout(&mut self, layout: SlideLayout) -> &mut Self {
        self.layout = layout;
        self
    }

    /// Set the canvas size in inches
    pub fn set_slide_size(&mut self, width: f64, height: f64) -> &mut Self {
        self.slide_width = inch_to_emu(width);
        self.slide_height = inch_to_emu(height);
        self
    }

    /// 10" x 7.5"
    pub fn set_slide_size_4x3(&mut self) -> &mut Self {
        self.slide_width = DEFAULT_SLIDE_WIDTH_EMU;
        self.slide_height = SLIDE_HEIGHT_4X3_EMU;
        self
    }

    /// 10" x 5.625" (the default)
    pub fn set_slide_size_16x9(&mut self) -> &mut Self {
        self.slide_width = DEFAULT_SLIDE_WIDTH_EMU;
        self.slide_height = DEFAULT_SLIDE_HEIGHT_EMU;
        self
    }

    /// 10" x 6.25"
    pub fn set_slide_size_16x10(&mut self) -> &mut Self {
        self.slide_width = DEFAULT_SLIDE_WIDTH_EMU;
        self.slide_height = SLIDE_HEIGHT_16X10_EMU;
        self
    }

    /// Fix the `created`/`modified` timestamps (W3CDTF, e.g.
    /// `2024-01-01T00:00:00Z`) so repeated writes are byte-identical
    pub fn set_timestamp(&mut self, timestamp: impl Into<String>) -> &mut Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Append a slide and return a builder bound to it
    pub fn add_slide(&mut self) -> SlideBuilder<'_> {
        let number = self.slides.len() + 1;
        self.slides.push(Slide::new(number, self.layout));
        SlideBuilder::new(self, number - 1)
    }

    /// Builder for an existing slide (0-based)
    pub fn slide_mut(&mut self, index: usize) -> Result<SlideBuilder<'_>> {
        if index >= self.slides.len() {
            return Err(PptxError::SlideOutOfRange {
                index,
                count: self.slides.len(),
            });
        }
        Ok(SlideBuilder::new(self, index))
    }

    /// Slide at a 0-based index
    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Media pool in allocation order
    pub fn media(&self) -> &[MediaEntry] {
        &self.media
    }

    /// Number of charts added so far
    pub fn chart_count(&self) -> usize {
        self.chart_count
    }

    pub fn properties(&self) -> &DocumentProperties {
        &self.properties
    }

    pub fn layout(&self) -> SlideLayout {
        self.layout
    }

    /// Canvas size in EMU
    pub fn slide_size(&self) -> (i64, i64) {
        (self.slide_width, self.slide_height)
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    pub(crate) fn slide_at_mut(&mut self, index: usize) -> &mut Slide {
        &mut self.slides[index]
    }

    /// Append bytes to the media pool and return the reference for a slide
    pub(crate) fn push_media(&mut self, kind: MediaKind, data: Vec<u8>, ext: &str) -> MediaRef {
        let index = self.media.len() + 1;
        let entry = MediaEntry {
            kind,
            index,
            ext: ext.to_string(),
            rel_id: format!("rId{}", index + kind.rel_offset()),
            data,
        };
        log::debug!(
            "Added media {} ({} bytes) as {}",
            entry.file_name(),
            entry.data.len(),
            entry.rel_id
        );
        let media_ref = entry.media_ref();
        self.media.push(entry);
        media_ref
    }

    /// Allocate the next presentation-wide chart index (1-based)
    pub(crate) fn next_chart_index(&mut self) -> usize {
        self.chart_count += 1;
        self.chart_count
    }

    /// Write the package into a seekable sink and hand the sink back
    pub fn write<W: Write + Seek>(&self, sink: W) -> Result<W> {
        PptxWriter::new(self).write_to(sink)
    }

    /// Serialize the package into memory
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let cursor = self.write(Cursor::new(Vec::new()))?;
        Ok(cursor.into_inner())
    }

    /// Serialize the package to a file
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = self.write(BufWriter::new(file))?;
        writer.flush()?;
        Ok(())
    }
}
