//! ZIP packaging of a [`Presentation`].
//!
//! Parts are written in a fixed order so that two writes of the same
//! presentation (with a fixed timestamp) produce identical part contents.

use std::io::{Cursor, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::chart::chart_part_xml;
use crate::error::{PptxError, Result};
use crate::presentation::Presentation;
use crate::relationships::Relationships;
use crate::slide::Slide;
use crate::xml::parts;
use crate::xml::slide::{slide_rels, slide_xml};

/// PPTX package writer
pub struct PptxWriter<'a> {
    pres: &'a Presentation,
}

impl<'a> PptxWriter<'a> {
    /// Create a writer over a presentation
    pub fn new(pres: &'a Presentation) -> Self {
        Self { pres }
    }

    /// Generate the PPTX as bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let cursor = self.write_to(Cursor::new(Vec::new()))?;
        Ok(cursor.into_inner())
    }

    /// Stream every part into `sink` and hand it back once the archive is finished
    pub fn write_to<W: Write + Seek>(&self, sink: W) -> Result<W> {
        let (width, height) = self.pres.slide_size();
        if width <= 0 || height <= 0 {
            return Err(PptxError::invalid_model(format!(
                "slide size must be positive, got {}x{} EMU",
                width, height
            )));
        }

        log::info!(
            "Writing presentation: {} slides, {} media parts, {} charts",
            self.pres.slide_count(),
            self.pres.media().len(),
            self.pres.chart_count()
        );

        let mut zip = ZipWriter::new(sink);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        // Write [Content_Types].xml
        self.write_part(
            &mut zip,
            options,
            "[Content_Types].xml",
            &parts::content_types(self.pres),
        )?;

        // Write _rels/.rels
        self.write_rels(&mut zip, options, "_rels/.rels", &parts::root_rels())?;

        // Write docProps
        self.write_part(&mut zip, options, "docProps/core.xml", &parts::core_xml(self.pres))?;
        self.write_part(&mut zip, options, "docProps/app.xml", &parts::app_xml(self.pres))?;

        // Write ppt/presentation.xml and its rels
        self.write_part(
            &mut zip,
            options,
            "ppt/presentation.xml",
            &parts::presentation_xml(self.pres),
        )?;
        self.write_rels(
            &mut zip,
            options,
            "ppt/_rels/presentation.xml.rels",
            &parts::presentation_rels(self.pres),
        )?;

        // Write presentation settings
        self.write_part(&mut zip, options, "ppt/presProps.xml", &parts::pres_props())?;
        self.write_part(&mut zip, options, "ppt/viewProps.xml", &parts::view_props())?;
        self.write_part(&mut zip, options, "ppt/tableStyles.xml", &parts::table_styles())?;

        // Write theme, master and layout
        self.write_part(&mut zip, options, "ppt/theme/theme1.xml", &parts::theme())?;
        self.write_slide_master(&mut zip, options)?;
        self.write_slide_layout(&mut zip, options)?;

        // Write slides
        for slide in self.pres.slides() {
            self.write_slide(&mut zip, options, slide)?;
        }

        // Write chart parts, numbered across the whole presentation
        for slide in self.pres.slides() {
            for chart in slide.charts() {
                let xml = chart_part_xml(chart);
                self.write_part(&mut zip, options, &chart.part_name(), &xml)?;
            }
        }

        // Write media files
        self.write_media(&mut zip, options)?;

        let sink = zip.finish()?;
        Ok(sink)
    }

    fn write_part<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
        name: &str,
        content: &str,
    ) -> Result<()> {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_rels<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
        name: &str,
        rels: &Relationships,
    ) -> Result<()> {
        self.write_part(zip, options, name, &rels.to_xml())
    }

    /// Write ppt/slideMasters/slideMaster1.xml and its rels
    fn write_slide_master<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        self.write_part(
            zip,
            options,
            "ppt/slideMasters/slideMaster1.xml",
            &parts::slide_master(),
        )?;
        self.write_rels(
            zip,
            options,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &parts::slide_master_rels(),
        )
    }

    /// Write ppt/slideLayouts/slideLayout1.xml and its rels
    fn write_slide_layout<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        self.write_part(
            zip,
            options,
            "ppt/slideLayouts/slideLayout1.xml",
            &parts::slide_layout(),
        )?;
        self.write_rels(
            zip,
            options,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &parts::slide_layout_rels(),
        )
    }

    /// Write ppt/slides/slideN.xml and its rels
    fn write_slide<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
        slide: &Slide,
    ) -> Result<()> {
        let n = slide.number();
        log::debug!("Writing slide {} ({} objects)", n, slide.objects().len());
        if slide.notes().is_some() {
            log::debug!("Slide {} has speaker notes; notes pages are not emitted", n);
        }

        self.write_part(
            zip,
            options,
            &format!("ppt/slides/slide{}.xml", n),
            &slide_xml(slide),
        )?;
        self.write_rels(
            zip,
            options,
            &format!("ppt/slides/_rels/slide{}.xml.rels", n),
            &slide_rels(slide),
        )
    }

    /// Write ppt/media/*
    fn write_media<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        for entry in self.pres.media() {
            zip.start_file(entry.part_name(), options)?;
            zip.write_all(&entry.data)?;
        }
        Ok(())
    }
}
