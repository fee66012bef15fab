//! Promptlens: AI generation metadata extraction for PNG uploads
//!
//! Reads the textual metadata that image-generation tools embed in PNG
//! files and normalizes it into one canonical record used for search and
//! display. Two mutually incompatible tool families are understood:
//!
//! - **A1111**: a free-text parameter block (`prompt`, `Negative prompt:`,
//!   and a `Steps: 20, Sampler: Euler a, ...` settings line) stored under
//!   the `parameters` text chunk.
//! - **ComfyUI**: a JSON node/edge graph stored under the `workflow` or
//!   `prompt` chunk, resolved by classifying nodes (checkpoint loaders,
//!   LoRA loaders, latent-size nodes, samplers).
//!
//! Every entry point is a pure function of its input and never fails:
//! malformed containers, unsupported compression, and unparsable JSON all
//! degrade to a partial or empty record.
//!
//! # Example
//!
//! ```
//! let record = promptlens::extract_record(b"not a png");
//! assert!(record.is_empty());
//! ```

pub mod a1111;
pub mod comfy;
pub mod extract;
pub mod png;
pub mod record;
mod value;

pub use comfy::{resolve_graph, resolve_graph_text, GraphExtraction, NodeSummary};
pub use extract::{
    extract, extract_from_chunks, extract_record, extract_with, Extraction, SourceKind,
};
pub use png::{
    read_text_chunks, read_text_chunks_with, Inflate, InflateError, NoInflate, TextChunkMap,
    ZlibInflater,
};
pub use record::{CanonicalRecord, LoraRef};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
