//! JSON rendering for IM documents.

use crate::error::Result;
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
///
/// Words are listed in arena order; links and stream IDs are arena indices.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc)?,
        JsonFormat::Compact => serde_json::to_string(doc)?,
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, WordId};

    fn sample() -> Document {
        let mut doc = Document::new("sample");
        doc.attributes.set("title", "Test");
        doc.add_page(0, BoundingBox::new(0, 100, 0, 100)).unwrap();
        let a = doc.add_word(0, BoundingBox::new(0, 10, 0, 10), "Hello").unwrap();
        let b = doc.add_word(0, BoundingBox::new(20, 30, 0, 10), "world").unwrap();
        doc.set_next_word(a, Some(b)).unwrap();
        doc
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"doc_id\": \"sample\""));
        assert!(json.contains("\"title\": \"Test\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["words"][0]["string"], "Hello");
        assert_eq!(value["words"][0]["next"], 1);
        assert_eq!(value["words"][1]["stream_pos"], 1);
    }

    #[test]
    fn test_stream_type_only_on_heads() {
        let mut doc = sample();
        let c = doc.add_word(0, BoundingBox::new(40, 50, 0, 10), "note").unwrap();
        doc.set_text_stream_type(c, "footnote");
        doc.set_next_word(WordId(1), Some(c)).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&to_json(&doc, JsonFormat::Compact).unwrap()).unwrap();
        assert_eq!(value["words"][0]["stream_type"], "main text");
        assert!(value["words"][1].get("stream_type").is_none());
        assert!(value["words"][2].get("stream_type").is_none());
    }
}
