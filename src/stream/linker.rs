//! Reordering, cutting and joining text streams.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::order::{sort_words, TextStreamOrder, WordOrder};
use crate::error::Result;
use crate::model::{AnnotationId, Document, WordId};

/// Link `words` into one contiguous run ordered by `order`.
///
/// The run is spliced into the surrounding streams at the closest former
/// external predecessor and successor. Streams outside the affected words
/// keep their other links. Fewer than two distinct words leave the document
/// unchanged.
pub fn order_stream<O: WordOrder + ?Sized>(
    doc: &mut Document,
    words: &[WordId],
    order: &O,
) -> Result<()> {
    let mut words = words.to_vec();
    sort_words(doc, &mut words, order);
    if words.len() < 2 {
        return Ok(());
    }

    let members: HashSet<WordId> = words.iter().copied().collect();
    let mut predecessors = Vec::new();
    let mut successors = Vec::new();
    for &word in &words {
        if let Some(prev) = doc.previous_word(word) {
            if !members.contains(&prev) {
                predecessors.push(prev);
            }
        }
        if let Some(next) = doc.next_word(word) {
            if !members.contains(&next) {
                successors.push(next);
            }
        }
    }

    let head = words[0];
    for pair in words.windows(2) {
        let (prev, word) = (pair[0], pair[1]);
        if doc.previous_word(word) == Some(prev) {
            continue;
        }
        // `word` sits upstream of the run built so far, so the path from it
        // into `prev` enters through the run's head
        if doc.reaches(word, prev) {
            doc.set_next_word(prev, None)?;
            doc.set_previous_word(head, None)?;
        }
        doc.set_next_word(prev, Some(word))?;
    }

    let tail = words[words.len() - 1];

    // closest first, preferring candidates on the correct side of the run
    predecessors.sort_by(|&a, &b| order.compare(doc, b, a));
    let (before, after): (Vec<_>, Vec<_>) = predecessors
        .into_iter()
        .partition(|&p| order.compare(doc, p, head) == Ordering::Less);
    let pred = before
        .into_iter()
        .chain(after)
        .find(|&p| !doc.reaches(head, p));
    if let Some(pred) = pred {
        if doc.previous_word(head) != Some(pred) {
            doc.set_next_word(pred, Some(head))?;
        }
    }

    successors.sort_by(|&a, &b| order.compare(doc, a, b));
    let (after, before): (Vec<_>, Vec<_>) = successors
        .into_iter()
        .partition(|&s| order.compare(doc, s, tail) == Ordering::Greater);
    let succ = after
        .into_iter()
        .chain(before)
        .find(|&s| !doc.reaches(s, tail));
    if let Some(succ) = succ {
        if doc.next_word(tail) != Some(succ) {
            doc.set_next_word(tail, Some(succ))?;
        }
    }

    log::debug!(
        "Ordered {} words into stream {}",
        words.len(),
        doc.word(head).text_stream_id()
    );
    Ok(())
}

/// Turn `words` into a text stream of their own.
///
/// Runs of words that are already consecutive in their streams are cut out
/// as units and joined end to end in text stream order; the remainders of
/// the source streams close up around the gaps. `stream_type` is assigned
/// to the new stream if given. If `annotation_type` is given, an annotation
/// spanning the new stream is created and returned.
pub fn make_stream(
    doc: &mut Document,
    words: &[WordId],
    stream_type: Option<&str>,
    annotation_type: Option<&str>,
) -> Result<Option<AnnotationId>> {
    let mut words = words.to_vec();
    sort_words(doc, &mut words, &TextStreamOrder);
    let (Some(&first), Some(&last)) = (words.first(), words.last()) else {
        return Ok(None);
    };

    let mut chunks: Vec<(WordId, WordId)> = Vec::new();
    let mut chunk_start = first;
    for pair in words.windows(2) {
        if doc.previous_word(pair[1]) != Some(pair[0]) {
            chunks.push((chunk_start, pair[0]));
            chunk_start = pair[1];
        }
    }
    chunks.push((chunk_start, last));

    let mut heads = Vec::with_capacity(chunks.len());
    for (start, end) in chunks {
        heads.push(cut_out_text_stream(doc, start, end)?.unwrap_or(start));
    }

    for pair in heads.windows(2) {
        let mut chunk_end = pair[0];
        while let Some(next) = doc.next_word(chunk_end) {
            chunk_end = next;
        }
        doc.set_next_word(chunk_end, Some(pair[1]))?;
    }

    if let Some(stream_type) = stream_type {
        doc.set_text_stream_type(first, stream_type);
    }
    log::debug!("Made stream of {} words in {} chunks", words.len(), heads.len());

    Ok(annotation_type.and_then(|annotation_type| doc.add_annotation(first, last, annotation_type)))
}

/// Detach the words from `first` to `last` from their text stream.
///
/// Reversed arguments are swapped. The former neighbors of the range are
/// linked to each other; the range keeps its internal links. Returns the
/// head of the detached range, or `None` if the two words lie in different
/// streams.
pub fn cut_out_text_stream(
    doc: &mut Document,
    first: WordId,
    last: WordId,
) -> Result<Option<WordId>> {
    let (a, b) = (doc.word(first), doc.word(last));
    if a.text_stream_id() != b.text_stream_id() {
        return Ok(None);
    }
    let (first, last) = if a.text_stream_pos() > b.text_stream_pos() {
        (last, first)
    } else {
        (first, last)
    };

    match (doc.previous_word(first), doc.next_word(last)) {
        (Some(pred), Some(succ)) => doc.set_next_word(pred, Some(succ))?,
        (Some(pred), None) => doc.set_next_word(pred, None)?,
        (None, Some(_)) => doc.set_next_word(last, None)?,
        (None, None) => {}
    }
    Ok(Some(first))
}
