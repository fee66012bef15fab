//! Canonical metadata record shared by every extraction source

use serde::{Deserialize, Serialize};

/// A named, weighted auxiliary model reference attached to a base model
/// at generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoraRef {
    /// LoRA name as written by the source tool (file stem or registry name)
    pub name: String,
    /// Model-weight multiplier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// CLIP-weight multiplier, when the source distinguishes it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_weight: Option<f64>,
}

impl LoraRef {
    /// Create a reference with no weights
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: None,
            clip_weight: None,
        }
    }

    /// Set the model weight
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Set the CLIP weight
    pub fn with_clip_weight(mut self, clip_weight: f64) -> Self {
        self.clip_weight = Some(clip_weight);
        self
    }

    /// Dedup key: trimmed, case-folded name
    pub(crate) fn dedup_key(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

/// The single normalized output record produced regardless of which source
/// format was detected.
///
/// Every field is optional and present only when actually discovered —
/// nothing is fabricated or defaulted. `seed` is kept textual to preserve
/// seeds larger than an f64 mantissa. Serialization skips absent fields, so
/// a record with nothing discovered serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanonicalRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positive_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_skip: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampler: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfg_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    /// LoRA references in first-encountered order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub loras: Vec<LoraRef>,
}

impl CanonicalRecord {
    /// True when nothing was discovered
    pub fn is_empty(&self) -> bool {
        self.positive_prompt.is_none()
            && self.negative_prompt.is_none()
            && self.steps.is_none()
            && self.clip_skip.is_none()
            && self.sampler.is_none()
            && self.model_name.is_none()
            && self.model_hash.is_none()
            && self.cfg_scale.is_none()
            && self.seed.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.loras.is_empty()
    }

    /// Append a LoRA reference unless a same-named one (case-insensitive,
    /// trimmed) is already present. The first occurrence keeps its weights.
    pub fn push_lora(&mut self, lora: LoraRef) {
        let key = lora.dedup_key();
        if key.is_empty() {
            return;
        }
        if self.loras.iter().any(|existing| existing.dedup_key() == key) {
            return;
        }
        self.loras.push(lora);
    }
}
