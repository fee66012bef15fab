//! Node classification
//!
//! The plugin ecosystem is open-ended — `CheckpointLoaderSimple`,
//! `CheckpointLoader|pysssss`, `Efficient Loader` variants, custom
//! samplers — so exact type-name matching would miss most real graphs.
//! Classification is a single substring match over the lower-cased type
//! name, collapsed into a closed sum so every handler downstream is
//! exhaustive.

/// Classification of a node type for canonical-field extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeClass {
    /// Base-model loader (`checkpoint`)
    Checkpoint,
    /// LoRA loader (`lora`)
    Lora,
    /// Output-resolution source (`latentimage`)
    LatentSize,
    /// Sampling node (`ksampler`)
    Sampler,
    /// Anything else; carries the raw type name
    Unknown(String),
}

/// Classify a node by its type/class name.
pub fn classify(node_type: &str) -> NodeClass {
    let lowered = node_type.to_lowercase();
    if lowered.contains("checkpoint") {
        NodeClass::Checkpoint
    } else if lowered.contains("lora") {
        NodeClass::Lora
    } else if lowered.contains("latentimage") {
        NodeClass::LatentSize
    } else if lowered.contains("ksampler") {
        NodeClass::Sampler
    } else {
        NodeClass::Unknown(node_type.to_string())
    }
}
