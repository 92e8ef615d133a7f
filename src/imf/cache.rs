//! Entry cache and the archive-backed image source.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use tempfile::TempDir;

use super::options::CacheMode;
use crate::error::Result;
use crate::model::{page_image_key, ImageFormat, PageImage, PageImageSource};

/// Store of archive entries for the duration of a load, and afterwards for
/// the page images of the loaded document.
///
/// A folder cache owns a private subfolder of the configured directory, so
/// documents loaded through the same directory never share entries. The
/// subfolder is removed when the cache is dropped.
#[derive(Debug)]
pub(crate) enum EntryCache {
    Memory(HashMap<String, Vec<u8>>),
    Folder(TempDir),
}

impl EntryCache {
    pub fn new(mode: &CacheMode) -> Result<Self> {
        match mode {
            CacheMode::Memory => Ok(EntryCache::Memory(HashMap::new())),
            CacheMode::Folder(dir) => {
                fs::create_dir_all(dir)?;
                let folder = tempfile::Builder::new().prefix("imf-").tempdir_in(dir)?;
                log::debug!("Caching archive entries in {}", folder.path().display());
                Ok(EntryCache::Folder(folder))
            }
        }
    }

    /// Folder holding the entries, if they are kept on disk.
    pub fn folder(&self) -> Option<&Path> {
        match self {
            EntryCache::Memory(_) => None,
            EntryCache::Folder(folder) => Some(folder.path()),
        }
    }

    /// Store an entry. Returns `false` if the name cannot be cached.
    pub fn put(&mut self, name: &str, data: &mut impl Read) -> Result<bool> {
        if !is_plain_name(name) {
            return Ok(false);
        }
        match self {
            EntryCache::Memory(entries) => {
                let mut buf = Vec::new();
                data.read_to_end(&mut buf)?;
                entries.insert(name.to_string(), buf);
            }
            EntryCache::Folder(dir) => {
                let mut file = File::create(dir.path().join(name))?;
                io::copy(data, &mut file)?;
            }
        }
        Ok(true)
    }

    /// Open a cached entry for reading.
    pub fn open(&self, name: &str) -> Result<Option<Box<dyn Read + '_>>> {
        match self {
            EntryCache::Memory(entries) => Ok(entries
                .get(name)
                .map(|data| Box::new(data.as_slice()) as Box<dyn Read + '_>)),
            EntryCache::Folder(dir) => {
                if !is_plain_name(name) {
                    return Ok(None);
                }
                match File::open(dir.path().join(name)) {
                    Ok(file) => Ok(Some(Box::new(io::BufReader::new(file)))),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    /// Read a cached entry into memory.
    pub fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        match self.open(name)? {
            Some(mut reader) => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf)?;
                Ok(Some(buf))
            }
            None => Ok(None),
        }
    }

    /// Drop an entry that is no longer needed.
    pub fn discard(&mut self, name: &str) -> Result<()> {
        match self {
            EntryCache::Memory(entries) => {
                entries.remove(name);
                Ok(())
            }
            EntryCache::Folder(dir) => {
                if !is_plain_name(name) {
                    return Ok(());
                }
                match fs::remove_file(dir.path().join(name)) {
                    Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
                    _ => Ok(()),
                }
            }
        }
    }
}

/// Entry names that map onto a single file inside the cache folder.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
}

/// Archive entry name of a page image.
pub(crate) fn image_entry_name(page_id: u32, format: ImageFormat) -> String {
    format!("page{:04}.{}", page_id, format.extension())
}

/// Parse an image entry name back into page ID and format.
pub(crate) fn parse_image_entry_name(name: &str) -> Option<(u32, ImageFormat)> {
    let (stem, ext) = name.strip_prefix("page")?.rsplit_once('.')?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((stem.parse().ok()?, ImageFormat::from_extension(ext)?))
}

/// Page images of a loaded archive, served from its entry cache.
#[derive(Debug)]
pub struct ArchiveImageSource {
    doc_id: String,
    cache: EntryCache,
    entries: BTreeMap<u32, (String, ImageFormat)>,
}

impl ArchiveImageSource {
    pub(crate) fn new(
        doc_id: impl Into<String>,
        cache: EntryCache,
        entries: BTreeMap<u32, (String, ImageFormat)>,
    ) -> Self {
        Self {
            doc_id: doc_id.into(),
            cache,
            entries,
        }
    }

    /// Page IDs that have an image in the archive.
    pub fn page_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    /// Private folder the images are served from, if cached on disk.
    pub fn cache_folder(&self) -> Option<&Path> {
        self.cache.folder()
    }

    fn page_for_key(&self, key: &str) -> Option<u32> {
        self.entries
            .keys()
            .copied()
            .find(|&page_id| page_image_key(&self.doc_id, page_id) == key)
    }
}

impl PageImageSource for ArchiveImageSource {
    fn fetch(&self, key: &str) -> Result<Option<PageImage>> {
        let Some(page_id) = self.page_for_key(key) else {
            log::debug!("No archived page image for key '{}'", key);
            return Ok(None);
        };
        let Some((name, format)) = self.entries.get(&page_id) else {
            return Ok(None);
        };
        Ok(self
            .cache
            .read(name)?
            .map(|data| PageImage::new(data, *format)))
    }
}
