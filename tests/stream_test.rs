//! Integration tests for text stream maintenance.

use std::cmp::Ordering;
use std::collections::HashSet;

use imdoc::model::{BoundingBox, Document, NextRelation, WordId};
use imdoc::stream::{
    cut_out_text_stream, get_string, make_stream, order_stream, stream_words, text_stream_heads,
    LayoutOrder, WordOrder,
};

/// One page, one stream per entry of `lengths`, every word on its own row so
/// that layout order equals creation order.
fn build(lengths: &[usize]) -> (Document, Vec<WordId>) {
    let mut doc = Document::new("streams");
    doc.add_page(0, BoundingBox::new(0, 1000, 0, 10_000)).unwrap();

    let mut all = Vec::new();
    for &length in lengths {
        let mut previous: Option<WordId> = None;
        for _ in 0..length {
            let row = all.len() as i32;
            let id = doc
                .add_word(
                    0,
                    BoundingBox::new(0, 50, row * 30, row * 30 + 20),
                    format!("w{}", row),
                )
                .unwrap();
            if let Some(previous) = previous {
                doc.set_next_word(previous, Some(id)).unwrap();
            }
            previous = Some(id);
            all.push(id);
        }
    }
    (doc, all)
}

/// Every link is mirrored, every word is reachable from exactly one head,
/// and stored stream IDs and positions match a fresh walk.
fn assert_streams_consistent(doc: &Document) {
    for (id, word) in doc.words() {
        if let Some(next) = word.next() {
            assert_eq!(doc.previous_word(next), Some(id), "next of {} not mirrored", id);
        }
        if let Some(prev) = word.previous() {
            assert_eq!(doc.next_word(prev), Some(id), "previous of {} not mirrored", id);
        }
    }

    let mut seen = HashSet::new();
    for (head, word) in doc.words() {
        if !word.is_stream_head() {
            continue;
        }
        for (pos, id) in stream_words(doc, head).enumerate() {
            assert!(seen.insert(id), "word {} visited twice", id);
            assert_eq!(doc.word(id).text_stream_id(), head);
            assert_eq!(doc.word(id).text_stream_pos(), pos);
        }
    }
    assert_eq!(seen.len(), doc.word_count(), "some words sit on a loop");
}

/// `(word, previous, next)` of every word in arena order.
fn links(doc: &Document) -> Vec<(WordId, Option<WordId>, Option<WordId>)> {
    doc.words().map(|(id, w)| (id, w.previous(), w.next())).collect()
}

/// Links between words that neither belong to `members` nor border one
/// must survive an edit of the members.
fn assert_links_kept_outside(
    before: &[(WordId, Option<WordId>, Option<WordId>)],
    doc: &Document,
    members: &[WordId],
) {
    let touches = |word: Option<WordId>| word.is_some_and(|w| members.contains(&w));
    for &(word, prev, next) in before {
        let Some(next) = next else { continue };
        let after_next = before[next.index()].2;
        if touches(Some(word)) || touches(Some(next)) || touches(prev) || touches(after_next) {
            continue;
        }
        assert_eq!(
            doc.next_word(word),
            Some(next),
            "link {} -> {} changed while editing {:?}",
            word,
            next,
            members
        );
    }
}

fn strings(doc: &Document, word: WordId) -> Vec<String> {
    let head = doc.word(word).text_stream_id();
    stream_words(doc, head)
        .map(|id| doc.word(id).string.clone())
        .collect()
}

fn subsets(items: &[WordId]) -> impl Iterator<Item = Vec<WordId>> + '_ {
    (0u32..(1 << items.len())).map(move |mask| {
        items
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, &id)| id)
            .collect()
    })
}

#[test]
fn test_order_stream_exhaustive_subsets() {
    let layouts: &[&[usize]] = &[&[4], &[5], &[3, 2], &[3, 3], &[2, 2, 1], &[2, 1, 2]];
    let reverse = |doc: &Document, a: WordId, b: WordId| LayoutOrder.compare(doc, b, a);
    // odd arena indices first, then even ones, each descending
    let interleaved = |_: &Document, a: WordId, b: WordId| {
        (a.index() % 2, a.index()).cmp(&(b.index() % 2, b.index())).reverse()
    };
    let orders: [&dyn WordOrder; 3] = [&LayoutOrder, &reverse, &interleaved];

    for lengths in layouts {
        let (_, all) = build(lengths);

        for subset in subsets(&all) {
            for order in orders {
                let (mut doc, _) = build(lengths);
                let before = links(&doc);
                order_stream(&mut doc, &subset, order).unwrap();
                assert_streams_consistent(&doc);
                assert_links_kept_outside(&before, &doc, &subset);

                let mut sorted = subset.clone();
                sorted.sort_by(|&a, &b| order.compare(&doc, a, b));
                for pair in sorted.windows(2) {
                    assert_eq!(
                        doc.next_word(pair[0]),
                        Some(pair[1]),
                        "{:?} ordering {:?}",
                        lengths,
                        subset
                    );
                }
            }
        }
    }
}

#[test]
fn test_order_stream_splices_into_neighbors() {
    // A B C / X Y Z, ordering {Y, B} by layout gives A B Y Z, C and X
    let (mut doc, ids) = build(&[3, 3]);
    let (b, c, x, y) = (ids[1], ids[2], ids[3], ids[4]);

    order_stream(&mut doc, &[y, b], &LayoutOrder).unwrap();

    assert_eq!(strings(&doc, b), vec!["w0", "w1", "w4", "w5"]);
    assert_eq!(strings(&doc, c), vec!["w2"]);
    assert_eq!(strings(&doc, x), vec!["w3"]);
    assert_streams_consistent(&doc);
}

#[test]
fn test_order_stream_in_layout_order_fixes_scrambled_stream() {
    let (mut doc, ids) = build(&[4]);
    // scramble: w2 w0 w3 w1
    make_stream(&mut doc, &[ids[2]], None, None).unwrap();
    doc.set_next_word(ids[2], Some(ids[0])).unwrap();
    doc.set_next_word(ids[0], Some(ids[3])).unwrap();
    doc.set_next_word(ids[3], Some(ids[1])).unwrap();
    assert_eq!(strings(&doc, ids[0]), vec!["w2", "w0", "w3", "w1"]);

    order_stream(&mut doc, &ids, &LayoutOrder).unwrap();
    assert_eq!(strings(&doc, ids[0]), vec!["w0", "w1", "w2", "w3"]);
    assert_streams_consistent(&doc);
}

#[test]
fn test_make_stream_exhaustive_subsets() {
    let layouts: &[&[usize]] = &[&[4], &[3, 2], &[2, 2, 1], &[3, 3]];
    for lengths in layouts {
        let (_, all) = build(lengths);
        for subset in subsets(&all).filter(|s| !s.is_empty()) {
            let (mut doc, _) = build(lengths);

            // expected order: by old stream, then old position
            let mut expected = subset.clone();
            expected.sort_by(|&a, &b| {
                let (wa, wb) = (doc.word(a), doc.word(b));
                (wa.text_stream_id(), wa.text_stream_pos())
                    .cmp(&(wb.text_stream_id(), wb.text_stream_pos()))
            });

            make_stream(&mut doc, &subset, Some("extract"), None).unwrap();
            assert_streams_consistent(&doc);

            let head = expected[0];
            assert!(doc.word(head).is_stream_head());
            assert_eq!(stream_words(&doc, head).collect::<Vec<_>>(), expected);
            assert_eq!(doc.text_stream_type(head), "extract");

            // each source stream closes up around the extracted words
            let mut offset = 0;
            for &length in lengths.iter() {
                let rest: Vec<WordId> = all[offset..offset + length]
                    .iter()
                    .filter(|id| !subset.contains(*id))
                    .copied()
                    .collect();
                offset += length;
                if let Some(&rest_head) = rest.first() {
                    assert!(doc.word(rest_head).is_stream_head());
                    assert_eq!(stream_words(&doc, rest_head).collect::<Vec<_>>(), rest);
                }
            }
        }
    }
}

#[test]
fn test_cut_out_every_range() {
    for first in 0..5 {
        for last in 0..5 {
            let (mut doc, ids) = build(&[5]);
            let head = cut_out_text_stream(&mut doc, ids[first], ids[last]).unwrap();

            let (lo, hi) = if first <= last { (first, last) } else { (last, first) };
            assert_eq!(head, Some(ids[lo]));
            assert_eq!(
                stream_words(&doc, ids[lo]).collect::<Vec<_>>(),
                ids[lo..=hi].to_vec()
            );

            let rest: Vec<WordId> = ids[..lo].iter().chain(&ids[hi + 1..]).copied().collect();
            if let Some(&rest_head) = rest.first() {
                assert_eq!(stream_words(&doc, rest_head).collect::<Vec<_>>(), rest);
            }
            assert_streams_consistent(&doc);
        }
    }
}

#[test]
fn test_get_string_along_edited_stream() {
    let mut doc = Document::new("text");
    doc.add_page(0, BoundingBox::new(0, 1000, 0, 1000)).unwrap();
    let words: Vec<WordId> = ["Scanned", "docu-", "ments", "(mostly)", "work."]
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let x = i as i32 * 100;
            doc.add_word(0, BoundingBox::new(x, x + 90, 0, 20), *s).unwrap()
        })
        .collect();
    doc.word_mut(words[1]).next_relation = NextRelation::Hyphenated;
    doc.word_mut(words[3]).next_relation = NextRelation::ParagraphEnd;

    order_stream(&mut doc, &words, &LayoutOrder).unwrap();
    assert_eq!(
        get_string(&doc, words[0], words[4], false),
        "Scanned documents (mostly)\r\nwork."
    );
    assert_eq!(
        get_string(&doc, words[0], words[4], true),
        "Scanned documents (mostly) work."
    );
    assert_eq!(text_stream_heads(&doc), vec![words[0]]);
}

#[test]
fn test_closure_orders_compare_consistently() {
    let (doc, ids) = build(&[2]);
    let by_string = |doc: &Document, a: WordId, b: WordId| doc.word(a).string.cmp(&doc.word(b).string);
    assert_eq!(by_string.compare(&doc, ids[0], ids[1]), Ordering::Less);
    assert_eq!(LayoutOrder.compare(&doc, ids[1], ids[0]), Ordering::Greater);
}
