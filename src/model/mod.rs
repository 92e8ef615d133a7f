//! Document model types for Image Markup documents.
//!
//! A document owns pages, pages own words, and words are additionally
//! threaded into logical text streams (reading order) that are independent
//! of their position on the page.

mod attributes;
mod bounds;
mod document;
mod image;
mod page;
mod region;
mod word;

pub use attributes::Attributes;
pub use bounds::BoundingBox;
pub use document::Document;
pub use image::{page_image_key, ImageFormat, PageImage, PageImageSource};
pub use page::{Page, DEFAULT_DPI};
pub use region::{Annotation, AnnotationId, Region, RegionId};
pub use word::{local_id, NextRelation, Word, WordId, DEFAULT_TEXT_STREAM_TYPE};
