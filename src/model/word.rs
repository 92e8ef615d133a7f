//! Word-level types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Attributes, BoundingBox};
use crate::error::{Error, Result};

/// Stream type assigned to text streams that have none.
pub const DEFAULT_TEXT_STREAM_TYPE: &str = "main text";

/// Stable index of a word in its document's word arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(pub(crate) usize);

impl WordId {
    /// Position of the word in the document's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a word joins its successor in the text stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextRelation {
    /// The successor continues the same token (no separator)
    Continue,
    /// Ordinary word separation
    #[default]
    Separate,
    /// The word ends a paragraph
    ParagraphEnd,
    /// The word is hyphenated and continues in the successor
    Hyphenated,
}

impl NextRelation {
    /// Single-character code used in the IMF words table.
    pub fn code(self) -> char {
        match self {
            NextRelation::Continue => 'C',
            NextRelation::Separate => 'S',
            NextRelation::ParagraphEnd => 'P',
            NextRelation::Hyphenated => 'H',
        }
    }

    /// Parse a relation from a single-character code.
    pub fn from_code(code: char) -> Result<Self> {
        match code {
            'C' => Ok(NextRelation::Continue),
            'S' => Ok(NextRelation::Separate),
            'P' => Ok(NextRelation::ParagraphEnd),
            'H' => Ok(NextRelation::Hyphenated),
            other => Err(Error::parse("next relation", other.to_string())),
        }
    }

    /// Parse a relation from the first character of a field.
    pub fn from_field(field: &str) -> Result<Self> {
        match field.chars().next() {
            Some(code) => Self::from_code(code),
            None => Err(Error::parse("next relation", field)),
        }
    }
}

/// A single OCR token on a page.
///
/// Content fields are public; navigation state is owned by the
/// [`Document`](super::Document) and changes only through its linking
/// operations.
#[derive(Debug, Clone, Serialize)]
pub struct Word {
    /// ID of the page the word lies on
    pub page_id: u32,

    /// Position on the page image
    pub bounds: BoundingBox,

    /// Literal text of the word
    pub string: String,

    /// How the word joins its successor
    pub next_relation: NextRelation,

    /// Generic attributes (font properties, OCR confidence, ...)
    pub attributes: Attributes,

    pub(crate) prev: Option<WordId>,
    pub(crate) next: Option<WordId>,
    pub(crate) stream_head: WordId,
    pub(crate) stream_pos: usize,
    /// Set on stream heads only
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) stream_type: String,
}

impl Word {
    pub(crate) fn new(id: WordId, page_id: u32, bounds: BoundingBox, string: String) -> Self {
        Self {
            page_id,
            bounds,
            string,
            next_relation: NextRelation::default(),
            attributes: Attributes::new(),
            prev: None,
            next: None,
            stream_head: id,
            stream_pos: 0,
            stream_type: DEFAULT_TEXT_STREAM_TYPE.to_string(),
        }
    }

    /// Document-unique key built from page ID and bounding box.
    pub fn local_id(&self) -> String {
        local_id(self.page_id, &self.bounds)
    }

    /// Predecessor in the text stream.
    pub fn previous(&self) -> Option<WordId> {
        self.prev
    }

    /// Successor in the text stream.
    pub fn next(&self) -> Option<WordId> {
        self.next
    }

    /// ID of the text stream, i.e. the arena ID of its head word.
    pub fn text_stream_id(&self) -> WordId {
        self.stream_head
    }

    /// Zero-based position in the text stream.
    pub fn text_stream_pos(&self) -> usize {
        self.stream_pos
    }

    /// Check whether the word starts its text stream.
    pub fn is_stream_head(&self) -> bool {
        self.prev.is_none()
    }
}

/// Build a local ID from its parts.
pub fn local_id(page_id: u32, bounds: &BoundingBox) -> String {
    format!("{}.{}", page_id, bounds)
}
