//! Text extraction along text streams.

use crate::model::{Document, NextRelation, WordId};

/// Concatenate the words from `first` to `last` (inclusive) along the text
/// stream.
///
/// Separated words get a space where [`needs_space`] says so, paragraph ends
/// become `"\r\n"` (or a space with `ignore_line_breaks`), and hyphenated
/// words lose their trailing character. Stops early at the end of the
/// stream if `last` is not reachable from `first`.
pub fn get_string(doc: &Document, first: WordId, last: WordId, ignore_line_breaks: bool) -> String {
    let mut out = String::new();
    let mut cursor = Some(first);

    while let Some(current) = cursor {
        let word = doc.word(current);
        out.push_str(&word.string);
        if current == last {
            break;
        }

        let Some(next) = word.next() else {
            break;
        };
        match word.next_relation {
            NextRelation::Separate => {
                if needs_space(&word.string, &doc.word(next).string) {
                    out.push(' ');
                }
            }
            NextRelation::ParagraphEnd => {
                out.push_str(if ignore_line_breaks { " " } else { "\r\n" });
            }
            NextRelation::Hyphenated => {
                out.pop();
            }
            NextRelation::Continue => {}
        }
        cursor = Some(next);
    }

    out
}

/// Check whether a space belongs between two adjacent tokens.
///
/// No space goes before closing punctuation, after opening brackets and
/// quotes, or between two characters of scripts that do not separate words
/// with spaces.
pub fn needs_space(before: &str, after: &str) -> bool {
    let (Some(last), Some(first)) = (before.chars().last(), after.chars().next()) else {
        return false;
    };

    if is_closing_punctuation(first) || is_opening_punctuation(last) {
        return false;
    }

    // Don't insert space between CJK characters
    !(is_spaceless_script_char(last) && is_spaceless_script_char(first))
}

fn is_closing_punctuation(c: char) -> bool {
    matches!(
        c,
        ',' | '.' | ';' | ':' | '!' | '?' | ')' | ']' | '}' | '%' | '\u{2019}' | '\u{201D}' | '\u{00BB}'
    )
}

fn is_opening_punctuation(c: char) -> bool {
    matches!(
        c,
        '(' | '[' | '{' | '\u{2018}' | '\u{201C}' | '\u{00AB}' | '\u{00BF}' | '\u{00A1}'
    )
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs
    (0x4E00..=0x9FFF).contains(&code)
    // CJK Unified Ideographs Extension A
    || (0x3400..=0x4DBF).contains(&code)
    // CJK Unified Ideographs Extension B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana
    || (0x3040..=0x309F).contains(&code)
    // Katakana
    || (0x30A0..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn stream(words: &[(&str, NextRelation)]) -> (Document, Vec<WordId>) {
        let mut doc = Document::new("doc");
        doc.add_page(0, BoundingBox::new(0, 2000, 0, 2000)).unwrap();
        let mut ids = Vec::new();
        for (i, (s, relation)) in words.iter().enumerate() {
            let x = i as i32 * 100;
            let id = doc.add_word(0, BoundingBox::new(x, x + 80, 0, 20), *s).unwrap();
            doc.word_mut(id).next_relation = *relation;
            if let Some(&prev) = ids.last() {
                doc.set_next_word(prev, Some(id)).unwrap();
            }
            ids.push(id);
        }
        (doc, ids)
    }

    #[test]
    fn test_separate_and_paragraph_end() {
        let (doc, ids) = stream(&[
            ("w1", NextRelation::Separate),
            ("w2", NextRelation::ParagraphEnd),
            ("w3", NextRelation::Separate),
        ]);
        assert_eq!(get_string(&doc, ids[0], ids[2], false), "w1 w2\r\nw3");
        assert_eq!(get_string(&doc, ids[0], ids[2], true), "w1 w2 w3");
        assert_eq!(get_string(&doc, ids[1], ids[1], false), "w2");
    }

    #[test]
    fn test_hyphenation_and_continue() {
        let (doc, ids) = stream(&[
            ("exam-", NextRelation::Hyphenated),
            ("ple", NextRelation::Separate),
            ("3", NextRelation::Continue),
            ("%", NextRelation::Separate),
            ("done", NextRelation::Separate),
        ]);
        assert_eq!(get_string(&doc, ids[0], ids[4], false), "example 3% done");
    }

    #[test]
    fn test_unreachable_last_truncates() {
        let (doc, ids) = stream(&[("a", NextRelation::Separate), ("b", NextRelation::Separate)]);
        // walking from b never meets a
        assert_eq!(get_string(&doc, ids[1], ids[0], false), "b");
    }

    #[test]
    fn test_needs_space() {
        assert!(needs_space("hello", "world"));
        assert!(!needs_space("hello", ","));
        assert!(!needs_space("(", "see"));
        assert!(!needs_space("word", ")"));
        assert!(!needs_space("漢", "字"));
        assert!(needs_space("한국", "어"));
        assert!(!needs_space("", "x"));
    }
}
