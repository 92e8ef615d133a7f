//! Page-level types.

use serde::Serialize;

use super::{Attributes, BoundingBox, WordId};

/// Resolution assumed for page images that do not state one.
pub const DEFAULT_DPI: u32 = 300;

/// A single scanned page in the document.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Page ID (zero-based page number)
    pub id: u32,

    /// Extent of the page image
    pub bounds: BoundingBox,

    /// Resolution of the page image in dots per inch
    pub dpi: u32,

    /// Generic page attributes
    pub attributes: Attributes,

    pub(crate) words: Vec<WordId>,
}

impl Page {
    pub(crate) fn new(id: u32, bounds: BoundingBox) -> Self {
        Self {
            id,
            bounds,
            dpi: DEFAULT_DPI,
            attributes: Attributes::new(),
            words: Vec::new(),
        }
    }

    /// Words on this page, in the order they were added.
    pub fn words(&self) -> &[WordId] {
        &self.words
    }

    /// Number of words on the page.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Check if the page has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Page image dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (i32, i32) {
        (self.bounds.width(), self.bounds.height())
    }

    /// Check if the page is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.bounds.width() > self.bounds.height()
    }
}
