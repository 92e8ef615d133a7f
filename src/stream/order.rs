//! Total orders over words.

use std::cmp::Ordering;

use crate::model::{Document, WordId};

/// A total order over the words of one document.
///
/// Closures of the form `Fn(&Document, WordId, WordId) -> Ordering` are
/// orders too.
pub trait WordOrder {
    /// Compare two words.
    fn compare(&self, doc: &Document, a: WordId, b: WordId) -> Ordering;
}

impl<F> WordOrder for F
where
    F: Fn(&Document, WordId, WordId) -> Ordering,
{
    fn compare(&self, doc: &Document, a: WordId, b: WordId) -> Ordering {
        self(doc, a, b)
    }
}

/// Page layout order: top to bottom, then left to right.
///
/// Words are compared by page ID, top edge, left edge, then bounding box
/// center, and finally by arena ID so that distinct words never compare
/// equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutOrder;

impl WordOrder for LayoutOrder {
    fn compare(&self, doc: &Document, a: WordId, b: WordId) -> Ordering {
        let (wa, wb) = (doc.word(a), doc.word(b));
        wa.page_id
            .cmp(&wb.page_id)
            .then(wa.bounds.top.cmp(&wb.bounds.top))
            .then(wa.bounds.left.cmp(&wb.bounds.left))
            .then_with(|| wa.bounds.center2().cmp(&wb.bounds.center2()))
            .then(a.cmp(&b))
    }
}

/// Existing text stream order: stream ID, then page ID, then position in
/// the stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextStreamOrder;

impl WordOrder for TextStreamOrder {
    fn compare(&self, doc: &Document, a: WordId, b: WordId) -> Ordering {
        let (wa, wb) = (doc.word(a), doc.word(b));
        wa.text_stream_id()
            .cmp(&wb.text_stream_id())
            .then(wa.page_id.cmp(&wb.page_id))
            .then(wa.text_stream_pos().cmp(&wb.text_stream_pos()))
    }
}

/// Sort words in place and drop duplicates.
pub(crate) fn sort_words<O: WordOrder + ?Sized>(doc: &Document, words: &mut Vec<WordId>, order: &O) {
    words.sort_unstable();
    words.dedup();
    words.sort_by(|&a, &b| order.compare(doc, a, b));
}
