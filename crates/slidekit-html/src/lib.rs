//! # slidekit-html
//!
//! Turns a small, flow-oriented HTML subset into a [`Presentation`].
//!
//! `<h1>` (and `<hr>`/`<section>`) start slides; headings, paragraphs, lists,
//! `<pre>` blocks, images and tables flow down the slide beneath the title.
//! Images may float left or right, in which case the blocks that follow are
//! set in the remaining column. Slides that run past the bottom edge are
//! scaled down uniformly, or paginated when that would make them too small.
//!
//! ## Example
//!
//! ```rust,no_run
//! let pres = slidekit_html::from_html(
//!     r#"<body style="background:#000">
//!          <h1 style="color:#FFF">Roadmap</h1>
//!          <p>Ship the parser</p>
//!          <ul><li>Floats</li><li>Pagination</li></ul>
//!        </body>"#,
//! );
//! pres.write_file("roadmap.pptx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod layout;
pub mod options;
pub mod parser;
pub mod source;
pub mod style;

use std::path::Path;
use std::time::Duration;

use slidekit_pptx::Presentation;

pub use error::{HtmlError, Result};
pub use layout::{estimate_height, fit_scale, measure, Placement};
pub use options::HtmlOptions;
pub use parser::{parse_html, Block, BlockKind, HtmlSlide};
pub use source::{ImageData, ImageLoader};
pub use style::{parse_length, Length};

/// Convert an HTML string with default options
pub fn from_html(html: &str) -> Presentation {
    from_html_with_options(html, &HtmlOptions::default())
}

/// Convert an HTML string
///
/// Relative image paths resolve against the current directory.
pub fn from_html_with_options(html: &str, opts: &HtmlOptions) -> Presentation {
    convert(html, opts, &loader_for(opts))
}

/// Read and convert an HTML file with default options
pub fn from_html_file(path: impl AsRef<Path>) -> Result<Presentation> {
    from_html_file_with_options(path, &HtmlOptions::default())
}

/// Read and convert an HTML file
///
/// Relative image paths resolve against the file's directory.
pub fn from_html_file_with_options(path: impl AsRef<Path>, opts: &HtmlOptions) -> Result<Presentation> {
    let path = path.as_ref();
    let html = std::fs::read_to_string(path)?;

    let mut loader = loader_for(opts);
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        loader = loader.with_base_dir(dir);
    }
    log::debug!("Converting {}", path.display());
    Ok(convert(&html, opts, &loader))
}

/// Convert an HTML file and write the deck to `out`
///
/// Failures while writing the package surface as [`HtmlError::Pptx`].
pub fn from_html_file_to(path: impl AsRef<Path>, out: impl AsRef<Path>) -> Result<()> {
    let out = out.as_ref();
    let pres = from_html_file(path)?;
    pres.write_file(out)?;
    log::info!("Wrote {} slides to {}", pres.slide_count(), out.display());
    Ok(())
}

fn loader_for(opts: &HtmlOptions) -> ImageLoader {
    ImageLoader::new(Duration::from_secs(opts.fetch_timeout_secs))
}

fn convert(html: &str, opts: &HtmlOptions, loader: &ImageLoader) -> Presentation {
    let mut slides = parse_html(html);
    source::resolve_images(&mut slides, loader);
    log::info!("Parsed {} slides from HTML", slides.len());

    let mut pres = Presentation::new();
    layout::render_slides(&slides, opts, &mut pres);
    pres
}
