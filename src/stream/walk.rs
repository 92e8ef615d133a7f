//! Navigation along text streams.

use super::order::{sort_words, LayoutOrder};
use super::text::get_string;
use crate::model::{Document, WordId};

/// Iterator over the words of a text stream, following `next` links.
#[derive(Debug, Clone)]
pub struct StreamWords<'a> {
    doc: &'a Document,
    cursor: Option<WordId>,
}

impl<'a> Iterator for StreamWords<'a> {
    type Item = WordId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = self.doc.next_word(current);
        Some(current)
    }
}

/// Iterate over a text stream starting at `from`.
pub fn stream_words(doc: &Document, from: WordId) -> StreamWords<'_> {
    StreamWords {
        doc,
        cursor: Some(from),
    }
}

/// Last word of the stream containing `word`.
pub fn stream_tail(doc: &Document, word: WordId) -> WordId {
    stream_words(doc, word).last().unwrap_or(word)
}

/// Head words of all text streams, in page layout order.
pub fn text_stream_heads(doc: &Document) -> Vec<WordId> {
    let mut heads: Vec<WordId> = doc
        .words()
        .filter(|(_, word)| word.is_stream_head())
        .map(|(id, _)| id)
        .collect();
    sort_words(doc, &mut heads, &LayoutOrder);
    heads
}

/// Full text of the stream containing `word`.
pub fn stream_text(doc: &Document, word: WordId, ignore_line_breaks: bool) -> String {
    let head = doc.word(word).text_stream_id();
    get_string(doc, head, stream_tail(doc, head), ignore_line_breaks)
}
