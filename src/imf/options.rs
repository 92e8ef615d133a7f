//! IMF container options and configuration.

use std::path::PathBuf;

use crate::model::ImageFormat;

/// Options for saving and loading IMF containers.
#[derive(Debug, Clone)]
pub struct ImfOptions {
    /// Format page images are expected in; names the image entries
    pub image_format: ImageFormat,

    /// Where archive entries are kept while loading
    pub cache: CacheMode,

    /// Whether to deflate the CSV tables
    pub compress_tables: bool,
}

impl ImfOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page image format.
    pub fn with_image_format(mut self, format: ImageFormat) -> Self {
        self.image_format = format;
        self
    }

    /// Keep loaded archive entries in memory.
    pub fn in_memory(mut self) -> Self {
        self.cache = CacheMode::Memory;
        self
    }

    /// Spill loaded archive entries into a folder on disk.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache = CacheMode::Folder(dir.into());
        self
    }

    /// Enable or disable table compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress_tables = compress;
        self
    }

    /// Store tables uncompressed.
    pub fn stored(mut self) -> Self {
        self.compress_tables = false;
        self
    }
}

impl Default for ImfOptions {
    fn default() -> Self {
        Self {
            image_format: ImageFormat::Png,
            cache: CacheMode::Memory,
            compress_tables: true,
        }
    }
}

/// Storage backend for archive entries during a load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Private in-memory map
    #[default]
    Memory,
    /// Files in the given folder, created if missing
    Folder(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = ImfOptions::new()
            .with_image_format(ImageFormat::Jpeg)
            .with_cache_dir("/tmp/imf-cache")
            .stored();

        assert_eq!(options.image_format, ImageFormat::Jpeg);
        assert_eq!(options.cache, CacheMode::Folder(PathBuf::from("/tmp/imf-cache")));
        assert!(!options.compress_tables);

        let options = options.in_memory().with_compression(true);
        assert_eq!(options.cache, CacheMode::Memory);
        assert!(options.compress_tables);
    }

    #[test]
    fn test_default_options() {
        let options = ImfOptions::default();
        assert_eq!(options.image_format, ImageFormat::Png);
        assert_eq!(options.cache, CacheMode::Memory);
        assert!(options.compress_tables);
    }
}
