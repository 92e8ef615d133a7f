//! IMF container codec.
//!
//! An IMF file is a ZIP archive with five CSV tables (`document.csv`,
//! `pages.csv`, `words.csv`, `regions.csv`, `annotations.csv`) and one image
//! entry per page (`page0000.png`, ...). Words reference each other by local
//! ID (`"<pageId>.[left,right,top,bottom]"`), so loading runs in two passes:
//! all words are created first, then previous-word references are resolved
//! into text stream links.
//!
//! # Example
//!
//! ```no_run
//! use imdoc::imf::{load_file, save_file, ImfOptions};
//!
//! fn main() -> imdoc::Result<()> {
//!     let options = ImfOptions::default();
//!     let doc = load_file("scan.imf", &options)?;
//!     println!("{} pages", doc.page_count());
//!     save_file(&doc, "copy.imf", &options)?;
//!     Ok(())
//! }
//! ```

mod attributes;
mod cache;
mod options;
mod reader;
mod rows;
mod writer;

use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;

pub use attributes::{decode_attributes, encode_attributes};
pub use cache::ArchiveImageSource;
pub use options::{CacheMode, ImfOptions};
pub use reader::load;
pub use writer::save;

use crate::error::Result;
use crate::model::Document;

/// Save a document to an IMF file.
pub fn save_file<P: AsRef<Path>>(doc: &Document, path: P, options: &ImfOptions) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = save(doc, BufWriter::new(file), options)?;
    writer.flush()?;
    Ok(())
}

/// Save a document into an in-memory IMF archive.
pub fn save_bytes(doc: &Document, options: &ImfOptions) -> Result<Vec<u8>> {
    Ok(save(doc, Cursor::new(Vec::new()), options)?.into_inner())
}

/// Load a document from an IMF file.
pub fn load_file<P: AsRef<Path>>(path: P, options: &ImfOptions) -> Result<Document> {
    let file = File::open(path.as_ref())?;
    load(BufReader::new(file), options)
}

/// Load a document from IMF archive bytes.
pub fn load_bytes(data: &[u8], options: &ImfOptions) -> Result<Document> {
    load(Cursor::new(data), options)
}
