//! End-to-end extraction over synthetic PNG files
//!
//! Drives the full path — chunk walk, source selection, per-source
//! parsing — against byte-accurate fixtures for both tool families.

mod common;

use common::{chunk, itxt_chunk, png, text_chunk, ztxt_chunk};
use promptlens::{extract, extract_record, extract_with, NoInflate, SourceKind};

const A1111_BLOCK: &str = "masterpiece, 1girl\nNegative prompt: bad hands, blurry\nSteps: 20, Sampler: Euler a, CFG scale: 7.5, Seed: 123456789012345, Size: 832x1216, Model: foo_v1 (pruned)";

// === Scenario: The canonical A1111 file extracts field for field ===
#[test]
fn a1111_png_extracts_full_record() {
    let bytes = png(&[text_chunk("parameters", A1111_BLOCK)]);
    let extraction = extract(&bytes);

    assert_eq!(extraction.source, Some(SourceKind::A1111));
    let record = extraction.record;
    assert_eq!(record.positive_prompt.as_deref(), Some("masterpiece, 1girl"));
    assert_eq!(record.negative_prompt.as_deref(), Some("bad hands, blurry"));
    assert_eq!(record.steps, Some(20));
    assert_eq!(record.sampler.as_deref(), Some("Euler a"));
    assert_eq!(record.cfg_scale, Some(7.5));
    assert_eq!(record.seed.as_deref(), Some("123456789012345"));
    assert_eq!(record.width, Some(832));
    assert_eq!(record.height, Some(1216));
    assert_eq!(record.model_name.as_deref(), Some("foo_v1 (pruned)"));
}

// === Scenario: Identical bytes produce deep-equal output on every run ===
#[test]
fn extraction_is_idempotent() {
    let bytes = png(&[text_chunk("parameters", A1111_BLOCK)]);
    let first = extract_record(&bytes);
    let second = extract_record(&bytes);
    let third = extract_record(&bytes);
    assert_eq!(first, second);
    assert_eq!(second, third);
}

// === Scenario: Non-PNG bytes give an empty record, never a panic ===
#[test]
fn non_png_bytes_yield_empty_record() {
    assert!(extract_record(b"JFIF not a png at all").is_empty());
    assert!(extract_record(&[]).is_empty());
}

// === Scenario: A zTXt parameter block inflates and parses ===
#[test]
fn ztxt_parameters_extract() {
    let bytes = png(&[ztxt_chunk("parameters", 0, A1111_BLOCK)]);
    let record = extract_record(&bytes);
    assert_eq!(record.steps, Some(20));
    assert_eq!(record.seed.as_deref(), Some("123456789012345"));
}

// === Scenario: Non-zero zTXt method drops the key — and the source ===
#[test]
fn ztxt_unknown_method_means_no_metadata() {
    let bytes = png(&[ztxt_chunk("parameters", 2, A1111_BLOCK)]);
    let extraction = extract(&bytes);
    assert!(extraction.record.is_empty());
    assert_eq!(extraction.source, None);
}

// === Scenario: Compressed iTXt workflow inflates and resolves ===
#[test]
fn compressed_itxt_workflow_extracts() {
    let graph = r#"{"3": {"class_type": "KSampler", "inputs": {"steps": 24, "cfg": 5.0, "sampler_name": "euler"}}}"#;
    let bytes = png(&[itxt_chunk("workflow", true, graph)]);
    let extraction = extract(&bytes);
    assert_eq!(extraction.source, Some(SourceKind::ComfyUi));
    assert_eq!(extraction.record.steps, Some(24));
    assert_eq!(extraction.record.cfg_scale, Some(5.0));
    assert_eq!(extraction.record.sampler.as_deref(), Some("euler"));
}

// === Scenario: Without an inflater, compressed sources degrade softly ===
#[test]
fn no_inflater_degrades_to_plain_chunks() {
    let bytes = png(&[
        ztxt_chunk("parameters", 0, A1111_BLOCK),
        text_chunk("Comment", "fallback prompt\nSteps: 2"),
    ]);
    // With inflation the zTXt parameters chunk wins…
    assert_eq!(extract(&bytes).record.steps, Some(20));
    // …without it, extraction falls back to the plain Comment chunk.
    let degraded = extract_with(&bytes, &NoInflate);
    assert_eq!(degraded.record.steps, Some(2));
    assert_eq!(
        degraded.record.positive_prompt.as_deref(),
        Some("fallback prompt")
    );
}

// === Scenario: Duplicate keywords — the last chunk wins ===
#[test]
fn duplicate_parameters_last_wins() {
    let bytes = png(&[
        text_chunk("parameters", "old\nSteps: 1"),
        text_chunk("parameters", "new\nSteps: 2"),
    ]);
    let record = extract_record(&bytes);
    assert_eq!(record.positive_prompt.as_deref(), Some("new"));
    assert_eq!(record.steps, Some(2));
}

// === Scenario: A1111 chunk outranks a ComfyUI graph in the same file ===
#[test]
fn a1111_outranks_comfy_in_same_file() {
    let graph = r#"{"3": {"class_type": "KSampler", "inputs": {"steps": 99}}}"#;
    let bytes = png(&[
        text_chunk("prompt", graph),
        text_chunk("parameters", "winner\nSteps: 7"),
    ]);
    let extraction = extract(&bytes);
    assert_eq!(extraction.source, Some(SourceKind::A1111));
    assert_eq!(extraction.record.steps, Some(7));
}

// === Scenario: Generic sd-metadata JSON maps onto the canonical schema ===
#[test]
fn sd_metadata_png_extracts() {
    let metadata = r#"{"model_name": "dream_v5", "image": {"prompt": "a quiet harbor",
        "Steps": 40, "cfgScale": 6.0, "seed": 99887766554433221, "width": 640, "height": 960}}"#;
    let bytes = png(&[text_chunk("sd-metadata", metadata)]);
    let extraction = extract(&bytes);
    assert_eq!(extraction.source, Some(SourceKind::SdMetadata));
    let record = extraction.record;
    assert_eq!(record.model_name.as_deref(), Some("dream_v5"));
    assert_eq!(record.positive_prompt.as_deref(), Some("a quiet harbor"));
    assert_eq!(record.steps, Some(40));
    assert_eq!(record.cfg_scale, Some(6.0));
    assert_eq!(record.seed.as_deref(), Some("99887766554433221"));
    assert_eq!(record.width, Some(640));
    assert_eq!(record.height, Some(960));
}

// === Scenario: No recognizable metadata source serializes to {} ===
#[test]
fn unrecognized_chunks_serialize_to_empty_object() {
    let bytes = png(&[
        text_chunk("Software", "some editor"),
        text_chunk("Author", "someone"),
    ]);
    let extraction = extract(&bytes);
    assert_eq!(extraction.source, None);
    assert_eq!(serde_json::to_string(&extraction.record).unwrap(), "{}");
}

// === Scenario: A truncated file still yields the chunks before the cut ===
#[test]
fn truncated_file_keeps_earlier_chunks() {
    let mut bytes = png(&[text_chunk("parameters", "kept\nSteps: 11")]);
    // Remove IEND and append a chunk header whose length overruns the file.
    bytes.truncate(bytes.len() - 12);
    bytes.extend_from_slice(&chunk(b"tEXt", b"orphan\0value")[..10]);
    let record = extract_record(&bytes);
    assert_eq!(record.positive_prompt.as_deref(), Some("kept"));
    assert_eq!(record.steps, Some(11));
}

// === Scenario: LoRA prompt tags surface in the canonical record ===
#[test]
fn a1111_lora_tags_extract() {
    let block = "a castle <lora:ink_style:0.8>, ramparts <lora:detail:0.5:0.7>\nSteps: 20";
    let bytes = png(&[text_chunk("parameters", block)]);
    let record = extract_record(&bytes);
    assert_eq!(record.loras.len(), 2);
    assert_eq!(record.loras[0].name, "ink_style");
    assert_eq!(record.loras[0].weight, Some(0.8));
    assert_eq!(record.loras[1].clip_weight, Some(0.7));
}
