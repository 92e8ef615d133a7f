//! Rendering module for converting documents to plain text and JSON.

mod json;
mod options;
mod text;

pub use json::{to_json, JsonFormat};
pub use options::TextOptions;
pub use text::to_text;
