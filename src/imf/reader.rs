//! IMF container reader.

use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Seek};

use super::attributes::decode_attributes;
use super::cache::{parse_image_entry_name, ArchiveImageSource, EntryCache};
use super::options::ImfOptions;
use super::rows::{
    read_document_row, read_table, AnnotationRow, DocumentRow, PageRow, RegionRow, Table,
    WordRow,
};
use super::writer::DPI_ATTRIBUTE;
use crate::error::{Error, Result};
use crate::model::{
    BoundingBox, Document, NextRelation, Region, RegionId, WordId, DEFAULT_DPI,
    DEFAULT_TEXT_STREAM_TYPE,
};

/// Read a document from an IMF container.
///
/// Entries are located through the central directory, so archives whose
/// sizes sit in trailing data descriptors load as well. Every entry is put
/// into the entry cache selected by `options` before any table is parsed.
/// Page images stay in the cache and are served lazily by the document's
/// image source.
pub fn load<R: Read + Seek>(reader: R, options: &ImfOptions) -> Result<Document> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut cache = EntryCache::new(&options.cache)?;
    let mut entry_names = Vec::new();
    let mut images = BTreeMap::new();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        if !cache.put(&name, &mut entry)? {
            log::warn!("Skipping archive entry '{}'", name);
            continue;
        }
        if let Some((page_id, format)) = parse_image_entry_name(&name) {
            images.insert(page_id, (name.clone(), format));
        }
        entry_names.push(name);
    }
    log::debug!("Cached {} archive entries", entry_names.len());

    let mut doc = read_document(&cache)?;
    read_pages(&mut doc, &cache)?;
    read_words(&mut doc, &cache)?;
    read_regions(&mut doc, &cache)?;
    read_annotations(&mut doc, &cache)?;

    images.retain(|page_id, (name, _)| {
        let known = doc.page(*page_id).is_some();
        if !known {
            log::warn!("Image entry '{}' belongs to no page", name);
        }
        known
    });
    for name in &entry_names {
        if !images.values().any(|(image, _)| image == name) {
            cache.discard(name)?;
        }
    }

    log::debug!(
        "Loaded document '{}': {} pages, {} words, {} regions, {} annotations, {} images",
        doc.doc_id,
        doc.page_count(),
        doc.word_count(),
        doc.regions().len(),
        doc.annotations().len(),
        images.len()
    );

    let source = ArchiveImageSource::new(doc.doc_id.clone(), cache, images);
    doc.set_image_source(Box::new(source));
    Ok(doc)
}

/// Rows of a table, or none if the archive lacks the entry.
fn rows<T: Table>(cache: &EntryCache) -> Result<Vec<T>> {
    match cache.open(T::ENTRY)? {
        Some(reader) => read_table(reader),
        None => {
            log::debug!("No {} in archive, assuming an empty table", T::ENTRY);
            Ok(Vec::new())
        }
    }
}

fn read_document(cache: &EntryCache) -> Result<Document> {
    let reader = cache
        .open(DocumentRow::ENTRY)?
        .ok_or_else(|| Error::Format(format!("missing {}", DocumentRow::ENTRY)))?;
    let row = read_document_row(reader)?;

    let mut doc = Document::new(row.doc_id);
    doc.attributes = decode_attributes(&row.attributes)?;
    Ok(doc)
}

fn read_pages(doc: &mut Document, cache: &EntryCache) -> Result<()> {
    for row in rows::<PageRow>(cache)? {
        let bounds: BoundingBox = row.bounds.parse()?;
        let mut attributes = decode_attributes(&row.attributes)?;
        let dpi = match attributes.remove(DPI_ATTRIBUTE) {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .map_err(|_| Error::parse("page DPI", value.as_str()))?,
            None => DEFAULT_DPI,
        };

        let page = doc.add_page(row.page_id, bounds)?;
        page.dpi = dpi;
        page.attributes = attributes;
    }
    Ok(())
}

fn read_words(doc: &mut Document, cache: &EntryCache) -> Result<()> {
    // all words must exist before links can be resolved
    let mut created: Vec<(WordId, WordRow)> = Vec::new();
    for row in rows::<WordRow>(cache)? {
        let bounds: BoundingBox = row.bounds.parse()?;
        let next_relation = NextRelation::from_field(&row.next_relation)?;
        let attributes = decode_attributes(&row.attributes)?;

        let id = doc.add_word(row.page_id, bounds, row.string.as_str())?;
        let word = doc.word_mut(id);
        word.next_relation = next_relation;
        word.attributes = attributes;
        created.push((id, row));
    }

    for (id, row) in &created {
        let previous = row.previous_word.trim();
        if !previous.is_empty() {
            match doc.word_by_local_id(previous) {
                Some(prev) => {
                    let displaced = doc.next_word(prev).filter(|claimed| claimed != id);
                    doc.link_unchecked(prev, *id);
                    if let Some(claimed) = displaced {
                        log::warn!(
                            "Word {} is the previous word of both {} and {}",
                            previous,
                            doc.word(claimed).local_id(),
                            doc.word(*id).local_id()
                        );
                        // the earlier claimant now starts a stream of its own
                        if let Some((_, claimed_row)) =
                            created.iter().find(|(word, _)| *word == claimed)
                        {
                            doc.word_mut(claimed).stream_type =
                                row_stream_type(claimed_row).to_string();
                        }
                    }
                    continue;
                }
                None => log::warn!(
                    "Word {} references unknown previous word {}",
                    doc.word(*id).local_id(),
                    previous
                ),
            }
        }

        doc.word_mut(*id).stream_type = row_stream_type(row).to_string();
    }

    doc.rebuild_streams()
}

/// Stream type a row assigns when its word starts a stream.
fn row_stream_type(row: &WordRow) -> &str {
    match row.text_stream_type.trim() {
        "" => DEFAULT_TEXT_STREAM_TYPE,
        _ => row.text_stream_type.as_str(),
    }
}

fn read_regions(doc: &mut Document, cache: &EntryCache) -> Result<()> {
    let mut known: HashMap<(String, u32, BoundingBox), RegionId> = HashMap::new();

    for row in rows::<RegionRow>(cache)? {
        let bounds: BoundingBox = row.bounds.parse()?;
        let attributes = decode_attributes(&row.attributes)?;
        let key = (row.region_type, row.page_id, bounds);

        if let Some(region) = known.get(&key).and_then(|&id| doc.region_mut(id)) {
            region.attributes.merge(&attributes);
            continue;
        }
        if doc.page(row.page_id).is_none() {
            log::warn!("Skipping region on unknown page {}", row.page_id);
            continue;
        }

        let mut region = Region::new(row.page_id, bounds, key.0.as_str());
        region.attributes = attributes;
        let id = doc.add_region(region)?;
        known.insert(key, id);
    }
    Ok(())
}

fn read_annotations(doc: &mut Document, cache: &EntryCache) -> Result<()> {
    for row in rows::<AnnotationRow>(cache)? {
        let attributes = decode_attributes(&row.attributes)?;
        let (Some(first), Some(last)) = (
            doc.word_by_local_id(row.first_word.trim()),
            doc.word_by_local_id(row.last_word.trim()),
        ) else {
            log::debug!(
                "Skipping {} annotation {} to {}: unknown word",
                row.annotation_type,
                row.first_word,
                row.last_word
            );
            continue;
        };

        if let Some(annotation) = doc
            .add_annotation(first, last, row.annotation_type)
            .and_then(|id| doc.annotation_mut(id))
        {
            annotation.attributes = attributes;
        }
    }
    Ok(())
}
