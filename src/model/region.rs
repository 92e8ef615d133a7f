//! Regions and annotations.

use serde::Serialize;

use super::{Attributes, BoundingBox, WordId};

/// Index of a region in its document.
pub type RegionId = usize;

/// Index of an annotation in its document.
pub type AnnotationId = usize;

/// A typed rectangular area on a page (block, column, image, ...).
#[derive(Debug, Clone, Serialize)]
pub struct Region {
    /// ID of the page the region lies on
    pub page_id: u32,

    /// Extent of the region
    pub bounds: BoundingBox,

    /// Region type (e.g. "block", "paragraph", "image")
    #[serde(rename = "type")]
    pub region_type: String,

    /// Generic region attributes
    pub attributes: Attributes,
}

impl Region {
    /// Create a region without attributes.
    pub fn new(page_id: u32, bounds: BoundingBox, region_type: impl Into<String>) -> Self {
        Self {
            page_id,
            bounds,
            region_type: region_type.into(),
            attributes: Attributes::new(),
        }
    }
}

/// A typed span of words within one text stream.
#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    /// First word of the span
    pub first_word: WordId,

    /// Last word of the span (inclusive)
    pub last_word: WordId,

    /// Annotation type (e.g. "heading", "emphasis")
    #[serde(rename = "type")]
    pub annotation_type: String,

    /// Generic annotation attributes
    pub attributes: Attributes,
}
