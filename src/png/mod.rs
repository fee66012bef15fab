//! PNG text-chunk extraction
//!
//! Walks a raw byte buffer's chunk structure and collects the textual
//! metadata chunks (`tEXt`, `zTXt`, `iTXt`) into a keyword→text map.
//! Input is untrusted upload content, so the walk never fails — it
//! degrades to a partial or empty map.

mod chunks;
mod inflate;

pub use chunks::{read_text_chunks, read_text_chunks_with, TextChunkMap};
pub use inflate::{Inflate, InflateError, NoInflate, ZlibInflater};
