//! Error types for imdoc library.

use std::io;
use thiserror::Error;

/// Result type alias for imdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while editing, saving or loading documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing the ZIP container.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error reading or writing one of the CSV tables.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The container is missing a required entry or field.
    #[error("Invalid IMF data: {0}")]
    Format(String),

    /// A field value could not be parsed.
    #[error("Cannot parse {what} from '{value}'")]
    Parse {
        /// What was being parsed (e.g. "bounding box")
        what: &'static str,
        /// The offending input
        value: String,
    },

    /// A page with this ID already exists.
    #[error("Page {0} already exists")]
    DuplicatePage(u32),

    /// A word with this local ID already exists.
    #[error("Word {0} already exists")]
    DuplicateWord(String),

    /// A page referenced by a word or region does not exist.
    #[error("Page {0} not found")]
    PageNotFound(u32),

    /// Linking two words would close a loop in a text stream.
    #[error("Linking {from} to {to} would create a text stream cycle")]
    StreamCycle {
        /// Local ID of the word whose successor was being set
        from: String,
        /// Local ID of the intended successor
        to: String,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn parse(what: &'static str, value: impl Into<String>) -> Self {
        Error::Parse {
            what,
            value: value.into(),
        }
    }
}
