//! Logical text stream maintenance.
//!
//! Words of a document are threaded into doubly linked reading-order
//! streams. This module reorders, cuts and joins those streams without
//! ever closing a loop, and extracts their text.
//!
//! # Example
//!
//! ```
//! use imdoc::model::{BoundingBox, Document};
//! use imdoc::stream::{get_string, order_stream, LayoutOrder};
//!
//! fn main() -> imdoc::Result<()> {
//!     let mut doc = Document::new("doc");
//!     doc.add_page(0, BoundingBox::new(0, 1000, 0, 1000))?;
//!     let world = doc.add_word(0, BoundingBox::new(60, 110, 0, 20), "world")?;
//!     let hello = doc.add_word(0, BoundingBox::new(0, 50, 0, 20), "Hello")?;
//!
//!     order_stream(&mut doc, &[world, hello], &LayoutOrder)?;
//!     assert_eq!(get_string(&doc, hello, world, false), "Hello world");
//!     Ok(())
//! }
//! ```

mod linker;
mod order;
mod text;
mod walk;

pub use linker::{cut_out_text_stream, make_stream, order_stream};
pub use order::{LayoutOrder, TextStreamOrder, WordOrder};
pub use text::{get_string, needs_space};
pub use walk::{stream_tail, stream_text, stream_words, text_stream_heads, StreamWords};
