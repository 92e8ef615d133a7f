//! Plain text rendering for IM documents.

use super::TextOptions;
use crate::model::Document;
use crate::stream::{stream_text, text_stream_heads};

/// Convert a document to plain text, one text stream after another in page
/// layout order of their first words.
pub fn to_text(doc: &Document, options: &TextOptions) -> String {
    let texts: Vec<String> = text_stream_heads(doc)
        .into_iter()
        .filter(|&head| match options.stream_type {
            Some(ref stream_type) => doc.text_stream_type(head) == stream_type,
            None => true,
        })
        .map(|head| stream_text(doc, head, options.ignore_line_breaks))
        .filter(|text| !text.trim().is_empty())
        .collect();

    texts.join(&options.stream_separator)
}
