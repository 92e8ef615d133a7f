//! Page image types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Raster format of a page image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG
    #[default]
    Png,
    /// JPEG
    Jpeg,
    /// TIFF
    Tiff,
}

impl ImageFormat {
    /// File extension used for archive entries.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Tiff => "tif",
        }
    }

    /// MIME type of the format.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Tiff => "image/tiff",
        }
    }

    /// Resolve a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "tif" | "tiff" => Some(ImageFormat::Tiff),
            _ => None,
        }
    }

    /// Detect the format from magic bytes.
    pub fn detect(data: &[u8]) -> Option<Self> {
        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(ImageFormat::Png);
        }

        // TIFF: 49 49 2A 00 (little-endian) or 4D 4D 00 2A (big-endian)
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some(ImageFormat::Tiff);
        }

        None
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s.trim()).ok_or_else(|| Error::parse("image format", s))
    }
}

/// Encoded raster image of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    /// Encoded image bytes
    pub data: Vec<u8>,

    /// Encoding of `data`
    pub format: ImageFormat,
}

impl PageImage {
    /// Create a page image.
    pub fn new(data: Vec<u8>, format: ImageFormat) -> Self {
        Self { data, format }
    }

    /// Create a page image, detecting the format from the data and falling
    /// back to PNG.
    pub fn detect(data: Vec<u8>) -> Self {
        let format = ImageFormat::detect(&data).unwrap_or_default();
        Self { data, format }
    }

    /// Size of the encoded image in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Lazy provider of page images.
///
/// Documents consult their source for pages without a stored image, using
/// the key `"<docId>.<pageId>"`.
pub trait PageImageSource: fmt::Debug + Send + Sync {
    /// Fetch the image stored under `key`, or `None` if there is none.
    fn fetch(&self, key: &str) -> Result<Option<PageImage>>;
}

/// Build the image key of a page.
pub fn page_image_key(doc_id: &str, page_id: u32) -> String {
    format!("{}.{}", doc_id, page_id)
}
