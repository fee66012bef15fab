//! Canonical normalizer — the single entry point for extraction
//!
//! Picks exactly one metadata source from the chunk map, in priority
//! order, and emits the unified record. Sources are mutually exclusive:
//! once a source's chunk key is present, later sources are never
//! consulted, even if the chosen chunk turns out to be empty or broken —
//! a file that says it is an A1111 export is an A1111 export.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::a1111::parse_parameter_block;
use crate::comfy::{resolve_graph_text, NodeSummary};
use crate::png::{read_text_chunks_with, Inflate, TextChunkMap, ZlibInflater};
use crate::record::CanonicalRecord;
use crate::value::{as_float, as_int, as_text, number_or_text};

/// Which tool family produced the metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    /// Free-text parameter block
    A1111,
    /// Generic flat JSON metadata
    SdMetadata,
    /// Node-graph export
    ComfyUi,
}

/// Full extraction outcome: the canonical record plus provenance that
/// callers surface alongside it (which family matched, and the per-node
/// graph summary for ComfyUI files).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    pub record: CanonicalRecord,
    /// Present only when a source actually matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceKind>,
    /// ComfyUI node summaries; empty for other sources
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeSummary>,
}

/// Chunk keys carrying an A1111 parameter block, in priority order.
const A1111_KEYS: [&str; 4] = ["parameters", "Parameters", "Comment", "Description"];

/// Chunk keys carrying generic flat JSON metadata.
const SD_METADATA_KEYS: [&str; 3] = ["sd-metadata", "sd_metadata", "SD:metadata"];

/// Chunk keys carrying a ComfyUI graph export.
const COMFY_KEYS: [&str; 4] = ["workflow", "prompt", "comfy", "ComfyUI"];

/// Extract metadata from PNG bytes.
pub fn extract(bytes: &[u8]) -> Extraction {
    extract_with(bytes, &ZlibInflater)
}

/// Extract metadata from PNG bytes with an injected inflater.
pub fn extract_with(bytes: &[u8], inflater: &dyn Inflate) -> Extraction {
    let chunks = read_text_chunks_with(bytes, inflater);
    extract_from_chunks(&chunks)
}

/// Record-only convenience over [`extract`].
pub fn extract_record(bytes: &[u8]) -> CanonicalRecord {
    extract(bytes).record
}

/// Run source selection over an already-read chunk map.
pub fn extract_from_chunks(chunks: &TextChunkMap) -> Extraction {
    if let Some(text) = first_present(chunks, &A1111_KEYS) {
        return Extraction {
            record: parse_parameter_block(text),
            source: Some(SourceKind::A1111),
            nodes: Vec::new(),
        };
    }

    if let Some(text) = first_present(chunks, &SD_METADATA_KEYS) {
        return Extraction {
            record: parse_sd_metadata(text),
            source: Some(SourceKind::SdMetadata),
            nodes: Vec::new(),
        };
    }

    if let Some(text) = first_present(chunks, &COMFY_KEYS) {
        let graph = resolve_graph_text(text);
        return Extraction {
            record: graph.record,
            source: Some(SourceKind::ComfyUi),
            nodes: graph.nodes,
        };
    }

    Extraction::default()
}

fn first_present<'a>(chunks: &'a TextChunkMap, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| chunks.get(*key).map(String::as_str))
}

/// Parse the generic flat-JSON metadata form.
///
/// Emitters disagree on casing, so every canonical field is looked up as
/// snake_case, camelCase and PascalCase, with a handful of aliases; some
/// nest the generation settings under an `image` object, consulted when
/// the top level misses.
fn parse_sd_metadata(text: &str) -> CanonicalRecord {
    let mut record = CanonicalRecord::default();

    let root: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(err) => {
            debug!(%err, "generic metadata JSON did not parse");
            return record;
        }
    };
    let Some(obj) = root.as_object() else {
        return record;
    };
    let nested = obj.get("image").and_then(Value::as_object);

    record.positive_prompt = lookup(obj, nested, &["positive_prompt", "prompt"])
        .and_then(prompt_text);
    record.negative_prompt =
        lookup(obj, nested, &["negative_prompt"]).and_then(|v| as_text(v));
    record.model_name = lookup(obj, nested, &["model_name", "model"]).and_then(|v| as_text(v));
    record.model_hash = lookup(obj, nested, &["model_hash"]).and_then(|v| as_text(v));
    record.sampler = lookup(obj, nested, &["sampler", "sampler_name"]).and_then(|v| as_text(v));
    record.steps = lookup(obj, nested, &["steps"]).and_then(|v| as_int(v));
    record.clip_skip = lookup(obj, nested, &["clip_skip"]).and_then(|v| as_int(v));
    record.cfg_scale = lookup(obj, nested, &["cfg_scale", "cfg"]).and_then(|v| as_float(v));
    record.seed = lookup(obj, nested, &["seed"]).and_then(|v| number_or_text(v));
    record.width = lookup(obj, nested, &["width"]).and_then(|v| as_int(v));
    record.height = lookup(obj, nested, &["height"]).and_then(|v| as_int(v));

    record
}

/// Look up the first of `names` present in the top-level object (trying
/// snake_case, camelCase and PascalCase spellings), then in the nested
/// object.
fn lookup<'a>(
    obj: &'a Map<String, Value>,
    nested: Option<&'a Map<String, Value>>,
    names: &[&str],
) -> Option<&'a Value> {
    for name in names {
        for spelling in spellings(name) {
            if let Some(value) = obj.get(&spelling) {
                return Some(value);
            }
        }
    }
    let nested = nested?;
    for name in names {
        for spelling in spellings(name) {
            if let Some(value) = nested.get(&spelling) {
                return Some(value);
            }
        }
    }
    None
}

/// snake_case → [snake_case, camelCase, PascalCase]
fn spellings(snake: &str) -> Vec<String> {
    let mut camel = String::with_capacity(snake.len());
    let mut upper_next = false;
    for ch in snake.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            camel.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            camel.push(ch);
        }
    }
    let mut pascal = String::with_capacity(camel.len());
    let mut chars = camel.chars();
    if let Some(first) = chars.next() {
        pascal.extend(first.to_uppercase());
        pascal.push_str(chars.as_str());
    }
    let mut out = vec![snake.to_string()];
    if camel != snake {
        out.push(camel);
    }
    if pascal != out[out.len() - 1] && pascal != *snake {
        out.push(pascal);
    }
    out
}

/// Prompt values are strings in most emitters, but some write
/// `[{"prompt": …, "weight": …}]`; the first entry's text is used.
fn prompt_text(value: &Value) -> Option<String> {
    match value {
        Value::String(_) => as_text(value),
        Value::Array(entries) => entries
            .first()
            .and_then(|entry| entry.get("prompt"))
            .and_then(|v| as_text(v)),
        _ => None,
    }
}
