//! IMF container writer.

use std::io::{Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::attributes::encode_attributes;
use super::cache::image_entry_name;
use super::options::ImfOptions;
use super::rows::{
    write_table, AnnotationRow, DocumentRow, PageRow, RegionRow, Table, WordRow,
};
use crate::error::Result;
use crate::model::{Document, WordId};

/// Page attribute carrying the page DPI.
pub(crate) const DPI_ATTRIBUTE: &str = "imageDPI";

/// Write a document as an IMF container and return the finished sink.
pub fn save<W: Write + Seek>(doc: &Document, writer: W, options: &ImfOptions) -> Result<W> {
    let mut zip = ZipWriter::new(writer);

    let tables = SimpleFileOptions::default().compression_method(if options.compress_tables {
        CompressionMethod::Deflated
    } else {
        CompressionMethod::Stored
    });
    // images are already compressed
    let images = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    zip.start_file(DocumentRow::ENTRY, tables)?;
    write_table(
        &mut zip,
        [DocumentRow {
            doc_id: doc.doc_id.clone(),
            attributes: encode_attributes(&doc.attributes),
        }],
    )?;

    zip.start_file(PageRow::ENTRY, tables)?;
    write_table(&mut zip, page_rows(doc))?;

    zip.start_file(WordRow::ENTRY, tables)?;
    write_table(&mut zip, word_rows(doc))?;

    zip.start_file(RegionRow::ENTRY, tables)?;
    write_table(&mut zip, region_rows(doc))?;

    zip.start_file(AnnotationRow::ENTRY, tables)?;
    write_table(&mut zip, annotation_rows(doc))?;

    let mut image_count = 0;
    for page in doc.pages() {
        let Some(image) = doc.page_image(page.id)? else {
            continue;
        };
        if image.format != options.image_format {
            log::warn!(
                "Page {} image is {}, not {}; storing as {}",
                page.id,
                image.format,
                options.image_format,
                image.format
            );
        }
        zip.start_file(image_entry_name(page.id, image.format), images)?;
        zip.write_all(&image.data)?;
        image_count += 1;
    }

    log::debug!(
        "Saved document '{}': {} pages, {} words, {} images",
        doc.doc_id,
        doc.page_count(),
        doc.word_count(),
        image_count
    );

    Ok(zip.finish()?)
}

fn page_rows(doc: &Document) -> impl Iterator<Item = PageRow> + '_ {
    doc.pages().map(|page| {
        let mut attributes = page.attributes.clone();
        attributes.set(DPI_ATTRIBUTE, page.dpi.to_string());
        PageRow {
            page_id: page.id,
            bounds: page.bounds.to_string(),
            attributes: encode_attributes(&attributes),
        }
    })
}

fn word_rows(doc: &Document) -> impl Iterator<Item = WordRow> + '_ {
    let local_id = move |id: Option<WordId>| {
        id.map(|id| doc.word(id).local_id()).unwrap_or_default()
    };

    doc.pages()
        .flat_map(|page| page.words().iter().copied())
        .map(move |id| {
            let word = doc.word(id);
            let text_stream_type = if word.is_stream_head() {
                doc.text_stream_type(id).to_string()
            } else {
                String::new()
            };
            WordRow {
                page_id: word.page_id,
                bounds: word.bounds.to_string(),
                string: word.string.clone(),
                previous_word: local_id(word.previous()),
                next_word: local_id(word.next()),
                next_relation: word.next_relation.code().to_string(),
                text_stream_type,
                attributes: encode_attributes(&word.attributes),
            }
        })
}

fn region_rows(doc: &Document) -> impl Iterator<Item = RegionRow> + '_ {
    doc.regions().iter().map(|region| RegionRow {
        page_id: region.page_id,
        bounds: region.bounds.to_string(),
        region_type: region.region_type.clone(),
        attributes: encode_attributes(&region.attributes),
    })
}

fn annotation_rows(doc: &Document) -> impl Iterator<Item = AnnotationRow> + '_ {
    doc.annotations().iter().map(|annotation| AnnotationRow {
        first_word: doc.word(annotation.first_word).local_id(),
        last_word: doc.word(annotation.last_word).local_id(),
        annotation_type: annotation.annotation_type.clone(),
        attributes: encode_attributes(&annotation.attributes),
    })
}
