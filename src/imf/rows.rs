//! CSV table schema of the IMF container.

use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A row type of one of the container's tables.
pub(crate) trait Table: Serialize + DeserializeOwned {
    /// Archive entry holding the table
    const ENTRY: &'static str;
    /// Column names, in field order
    const HEADER: &'static [&'static str];
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DocumentRow {
    pub doc_id: String,
    #[serde(default)]
    pub attributes: String,
}

impl Table for DocumentRow {
    const ENTRY: &'static str = "document.csv";
    const HEADER: &'static [&'static str] = &["docId", "attributes"];
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageRow {
    pub page_id: u32,
    pub bounds: String,
    #[serde(default)]
    pub attributes: String,
}

impl Table for PageRow {
    const ENTRY: &'static str = "pages.csv";
    const HEADER: &'static [&'static str] = &["pageId", "bounds", "attributes"];
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WordRow {
    pub page_id: u32,
    pub bounds: String,
    #[serde(default)]
    pub string: String,
    #[serde(default)]
    pub previous_word: String,
    #[serde(default)]
    pub next_word: String,
    pub next_relation: String,
    #[serde(default)]
    pub text_stream_type: String,
    #[serde(default)]
    pub attributes: String,
}

impl Table for WordRow {
    const ENTRY: &'static str = "words.csv";
    const HEADER: &'static [&'static str] = &[
        "pageId",
        "bounds",
        "string",
        "previousWord",
        "nextWord",
        "nextRelation",
        "textStreamType",
        "attributes",
    ];
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegionRow {
    pub page_id: u32,
    pub bounds: String,
    #[serde(rename = "type")]
    pub region_type: String,
    #[serde(default)]
    pub attributes: String,
}

impl Table for RegionRow {
    const ENTRY: &'static str = "regions.csv";
    const HEADER: &'static [&'static str] = &["pageId", "bounds", "type", "attributes"];
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnnotationRow {
    pub first_word: String,
    pub last_word: String,
    #[serde(rename = "type")]
    pub annotation_type: String,
    #[serde(default)]
    pub attributes: String,
}

impl Table for AnnotationRow {
    const ENTRY: &'static str = "annotations.csv";
    const HEADER: &'static [&'static str] = &["firstWord", "lastWord", "type", "attributes"];
}

/// Write a table with its header row, even if it has no rows.
pub(crate) fn write_table<T, W, I>(writer: W, rows: I) -> Result<()>
where
    T: Table,
    W: Write,
    I: IntoIterator<Item = T>,
{
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(T::HEADER)?;
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Read all rows of a table, matching columns by header name.
pub(crate) fn read_table<T: Table, R: Read>(reader: R) -> Result<Vec<T>> {
    let mut csv = csv::ReaderBuilder::new().from_reader(reader);
    let mut rows = Vec::new();
    for row in csv.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Read the single row of the document table.
pub(crate) fn read_document_row<R: Read>(reader: R) -> Result<DocumentRow> {
    let mut csv = csv::ReaderBuilder::new().from_reader(reader);
    if !csv.headers()?.iter().any(|column| column == "docId") {
        return Err(Error::Format(format!(
            "{} has no docId column",
            DocumentRow::ENTRY
        )));
    }

    let row: Option<DocumentRow> = csv.deserialize().next().transpose()?;
    match row {
        Some(row) if !row.doc_id.trim().is_empty() => Ok(row),
        _ => Err(Error::Format(format!(
            "{} holds no document ID",
            DocumentRow::ENTRY
        ))),
    }
}
