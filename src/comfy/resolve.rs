//! Graph resolution into the canonical record
//!
//! One pass over the normalized node list. Field precedence is
//! deliberately asymmetric: the first checkpoint (and latent-size) node
//! that yields a value wins, while sampler fields are overwritten on every
//! KSampler encountered — multi-stage graphs (hires-fix and friends) put
//! the pass that produced the final image last, and real libraries depend
//! on that reading.

use serde_json::Value;
use tracing::debug;

use super::classify::{classify, NodeClass};
use super::node::{normalize_graph, GraphNode, NodeSummary};
use crate::record::{CanonicalRecord, LoraRef};
use crate::value::{as_float, as_int, number_or_text};

/// Result of resolving one graph export.
#[derive(Debug, Clone, Default)]
pub struct GraphExtraction {
    /// Canonical fields discovered in the graph
    pub record: CanonicalRecord,
    /// One summary per node, classified or not
    pub nodes: Vec<NodeSummary>,
}

/// Resolve a graph from JSON text. Unparsable JSON yields an empty
/// extraction, never an error.
pub fn resolve_graph_text(text: &str) -> GraphExtraction {
    match serde_json::from_str::<Value>(text) {
        Ok(root) => resolve_graph(&root),
        Err(err) => {
            debug!(%err, "graph JSON did not parse");
            GraphExtraction::default()
        }
    }
}

/// Resolve an already-parsed graph value.
pub fn resolve_graph(root: &Value) -> GraphExtraction {
    let (nodes, _links) = normalize_graph(root);
    let mut record = CanonicalRecord::default();

    for node in &nodes {
        match classify(&node.node_type) {
            NodeClass::Checkpoint => {
                if record.model_name.is_none() {
                    record.model_name = checkpoint_name(node);
                }
            }
            NodeClass::Lora => {
                if let Some(lora) = lora_ref(node) {
                    record.push_lora(lora);
                }
            }
            NodeClass::LatentSize => {
                let (width, height) = latent_size(node);
                if record.width.is_none() {
                    record.width = width;
                }
                if record.height.is_none() {
                    record.height = height;
                }
            }
            NodeClass::Sampler => apply_sampler(node, &mut record),
            NodeClass::Unknown(_) => {}
        }
    }

    let summaries = nodes.iter().map(NodeSummary::from).collect();
    GraphExtraction {
        record,
        nodes: summaries,
    }
}

/// Checkpoint name: `inputs.ckpt_name`, `inputs.model`,
/// `properties.ckpt_name`, else the first string widget value.
fn checkpoint_name(node: &GraphNode) -> Option<String> {
    node.input_text("ckpt_name")
        .or_else(|| node.input_text("model"))
        .or_else(|| node.property_text("ckpt_name"))
        .or_else(|| node.string_widgets().next().map(str::to_string))
}

/// LoRA reference; a node yielding no name is discarded.
fn lora_ref(node: &GraphNode) -> Option<LoraRef> {
    let name = node
        .input_text("lora_name")
        .or_else(|| node.input_text("lora"))
        .or_else(|| node.property_text("lora_name"))
        .or_else(|| node.widget(0).and_then(Value::as_str).map(str::to_string))?;

    let mut lora = LoraRef::new(name);
    lora.weight = node
        .input_float("strength_model")
        .or_else(|| node.input_float("strength"))
        .or_else(|| node.property_float("strength_model"))
        .or_else(|| node.numeric_widgets().first().and_then(|v| as_float(v)));
    lora.clip_weight = node
        .input_float("strength_clip")
        .or_else(|| node.property_float("strength_clip"));
    Some(lora)
}

/// Width/height: structured fields first, else the first two numeric
/// widget values.
fn latent_size(node: &GraphNode) -> (Option<i64>, Option<i64>) {
    let widgets = node.numeric_widgets();
    let width = node
        .input_int("width")
        .or_else(|| node.property_int("width"))
        .or_else(|| widgets.first().and_then(|v| as_int(v)));
    let height = node
        .input_int("height")
        .or_else(|| node.property_int("height"))
        .or_else(|| widgets.get(1).and_then(|v| as_int(v)));
    (width, height)
}

/// `control_after_generate` and `add_noise` widget values; never a
/// sampler name.
const NON_SAMPLER_WIDGETS: [&str; 6] = [
    "fixed",
    "increment",
    "decrement",
    "randomize",
    "enable",
    "disable",
];

/// Sampler fields overwrite on every matched node, but only with values
/// the node actually yields — a bare follow-up sampler cannot erase data.
///
/// Widget fallback follows the stock KSampler layout `[seed, control,
/// steps, cfg, sampler, scheduler, denoise]`: seed/steps/cfg are the first
/// three numeric widgets, the sampler name is the first string widget that
/// is not a control or noise-toggle value.
fn apply_sampler(node: &GraphNode, record: &mut CanonicalRecord) {
    let widgets = node.numeric_widgets();

    let seed = node
        .input_seed("seed")
        .or_else(|| node.input_seed("noise_seed"))
        .or_else(|| node.property_seed("seed"))
        .or_else(|| widgets.first().and_then(|v| number_or_text(v)));
    if seed.is_some() {
        record.seed = seed;
    }

    let steps = node
        .input_int("steps")
        .or_else(|| node.property_int("steps"))
        .or_else(|| widgets.get(1).and_then(|v| as_int(v)));
    if steps.is_some() {
        record.steps = steps;
    }

    let cfg = node
        .input_float("cfg")
        .or_else(|| node.property_float("cfg"))
        .or_else(|| widgets.get(2).and_then(|v| as_float(v)));
    if cfg.is_some() {
        record.cfg_scale = cfg;
    }

    let sampler = node
        .input_text("sampler_name")
        .or_else(|| node.property_text("sampler_name"))
        .or_else(|| {
            node.string_widgets()
                .find(|s| !NON_SAMPLER_WIDGETS.contains(&s.trim()))
                .map(str::to_string)
        });
    if sampler.is_some() {
        record.sampler = sampler;
    }
}
