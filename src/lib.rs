//! # imdoc
//!
//! Image Markup document model for scanned documents.
//!
//! Pages carry OCR words with bounding boxes. Words are threaded into
//! logical text streams (reading order) that can be reordered, cut and
//! joined without ever forming a loop, and whole documents round-trip
//! through the IMF container (a ZIP of CSV tables plus page images).
//!
//! ## Quick Start
//!
//! ```no_run
//! use imdoc::{load_file, render, ImfOptions, TextOptions};
//!
//! fn main() -> imdoc::Result<()> {
//!     let doc = load_file("scan.imf", &ImfOptions::default())?;
//!
//!     let text = render::to_text(&doc, &TextOptions::default());
//!     println!("{}", text);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Text streams**: cycle-free reordering, cutting and joining of words
//! - **IMF container**: lossless save and two-pass load
//! - **Entry cache**: archive entries kept in memory or spilled to disk
//! - **Lazy page images**: served from the archive on demand

pub mod error;
pub mod imf;
pub mod model;
pub mod render;
pub mod stream;

// Re-export commonly used types
pub use error::{Error, Result};
pub use imf::{
    load, load_bytes, load_file, save, save_bytes, save_file, ArchiveImageSource, CacheMode,
    ImfOptions,
};
pub use model::{
    Annotation, AnnotationId, Attributes, BoundingBox, Document, ImageFormat, NextRelation, Page,
    PageImage, PageImageSource, Region, RegionId, Word, WordId, DEFAULT_TEXT_STREAM_TYPE,
};
pub use render::{JsonFormat, TextOptions};
pub use stream::{
    cut_out_text_stream, get_string, make_stream, order_stream, LayoutOrder, TextStreamOrder,
    WordOrder,
};

use std::path::Path;

/// Extract the plain text of an IMF file.
///
/// # Example
///
/// ```no_run
/// use imdoc::extract_text;
///
/// let text = extract_text("scan.imf").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = load_file(path, &ImfOptions::default())?;
    Ok(render::to_text(&doc, &TextOptions::default()))
}

/// Convert an IMF file to JSON.
///
/// # Example
///
/// ```no_run
/// use imdoc::{to_json, JsonFormat};
///
/// let json = to_json("scan.imf", JsonFormat::Pretty).unwrap();
/// std::fs::write("scan.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = load_file(path, &ImfOptions::default())?;
    render::to_json(&doc, format)
}
