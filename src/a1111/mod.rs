//! A1111 parameter-block parser
//!
//! The block is one free-text value laid out as:
//!
//! ```text
//! positive prompt, possibly
//! spanning lines
//! Negative prompt: the negative prompt
//! Steps: 20, Sampler: Euler a, CFG scale: 7.5, Seed: 123, Size: 832x1216, Model: foo_v1 (pruned)
//! ```
//!
//! The settings line splits on commas, but model names like
//! `foo_v1 (pruned)` and quoted hash blobs embed commas of their own, so
//! the split is guarded by paren/quote tracking. Unknown keys are dropped
//! without complaint; the format grows new keys with every tool release.

use crate::record::{CanonicalRecord, LoraRef};

/// Parse one parameter block into a partial canonical record.
///
/// Every field is best-effort: a missing or malformed value leaves the
/// field unset, never zeroed.
pub fn parse_parameter_block(text: &str) -> CanonicalRecord {
    let mut record = CanonicalRecord::default();
    let lines: Vec<&str> = text.lines().collect();

    let negative_at = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| strip_negative_prefix(line).map(|rest| (i, rest)));

    let settings = match negative_at {
        Some((i, negative)) => {
            let positive = lines[..i].join(" ");
            set_text(&mut record.positive_prompt, &positive);
            set_text(&mut record.negative_prompt, negative);
            lines[i + 1..].join(", ")
        }
        None => {
            // No negative prompt: the first line is the prompt, everything
            // after it is treated as settings.
            if let Some(first) = lines.first() {
                set_text(&mut record.positive_prompt, first);
            }
            lines.get(1..).unwrap_or(&[]).join(", ")
        }
    };

    for token in split_guarded(&settings) {
        let Some((key, value)) = token.split_once(':') else {
            continue;
        };
        apply_setting(&mut record, key, value);
    }

    if let Some(prompt) = record.positive_prompt.clone() {
        collect_lora_tags(&prompt, &mut record);
    }

    record
}

/// Match `negative prompt\s*:` (case-insensitive) at the start of a line,
/// returning the remainder after the colon.
fn strip_negative_prefix(line: &str) -> Option<&str> {
    const PREFIX: &[u8] = b"negative prompt";
    let bytes = line.as_bytes();
    if bytes.len() < PREFIX.len() || !bytes[..PREFIX.len()].eq_ignore_ascii_case(PREFIX) {
        return None;
    }
    // The prefix is pure ASCII, so this slice lands on a char boundary.
    let rest = line[PREFIX.len()..].trim_start();
    rest.strip_prefix(':')
}

/// Split on commas that are not inside `()` or `"…"` spans.
fn split_guarded(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut start = 0usize;

    for (i, ch) in text.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '(' if !in_quotes => depth += 1,
            ')' if !in_quotes => depth = depth.saturating_sub(1),
            ',' if !in_quotes && depth == 0 => {
                tokens.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    tokens.push(&text[start..]);
    tokens
}

/// Apply one recognized `key: value` setting; unknown keys are ignored.
fn apply_setting(record: &mut CanonicalRecord, key: &str, value: &str) {
    match key.trim().to_lowercase().as_str() {
        "steps" => set_int(&mut record.steps, value),
        "sampler" | "sampler name" => set_text(&mut record.sampler, value),
        "cfg scale" | "cfg" => set_float(&mut record.cfg_scale, value),
        "seed" => set_text(&mut record.seed, value),
        "size" => {
            if let Some((width, height)) = parse_size(value) {
                record.width = Some(width);
                record.height = Some(height);
            }
        }
        "model" | "model name" => set_text(&mut record.model_name, value),
        "model hash" | "hash" => set_text(&mut record.model_hash, value),
        "clip skip" | "clipskip" => set_int(&mut record.clip_skip, value),
        _ => {}
    }
}

/// `832x1216` or `832×1216`, whitespace-tolerant.
fn parse_size(value: &str) -> Option<(i64, i64)> {
    let (w, h) = value.split_once(|c| c == 'x' || c == 'X' || c == '×')?;
    Some((parse_int(w)?, parse_int(h)?))
}

/// Strip everything outside `[0-9.+-]`, then parse. Returns None rather
/// than zero on anything unparsable.
fn numeric_fragment(raw: &str) -> Option<String> {
    let fragment: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-'))
        .collect();
    if fragment.is_empty() {
        None
    } else {
        Some(fragment)
    }
}

fn parse_int(raw: &str) -> Option<i64> {
    let fragment = numeric_fragment(raw)?;
    fragment
        .parse::<i64>()
        .ok()
        .or_else(|| fragment.parse::<f64>().ok().map(|f| f as i64))
}

fn parse_float(raw: &str) -> Option<f64> {
    numeric_fragment(raw)?.parse::<f64>().ok()
}

fn set_int(slot: &mut Option<i64>, raw: &str) {
    if let Some(v) = parse_int(raw) {
        *slot = Some(v);
    }
}

fn set_float(slot: &mut Option<f64>, raw: &str) {
    if let Some(v) = parse_float(raw) {
        *slot = Some(v);
    }
}

fn set_text(slot: &mut Option<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        *slot = Some(trimmed.to_string());
    }
}

/// Collect `<lora:name:weight[:clip_weight]>` prompt tags into the record.
///
/// The tags stay in the prompt text; they are the tool's inline syntax for
/// attaching LoRAs and double as the only record of them in this format.
fn collect_lora_tags(prompt: &str, record: &mut CanonicalRecord) {
    let mut rest = prompt;
    while let Some(start) = rest.find("<lora:") {
        let after = &rest[start + "<lora:".len()..];
        let Some(end) = after.find('>') else {
            break;
        };
        let mut parts = after[..end].split(':');
        if let Some(name) = parts.next() {
            let name = name.trim();
            if !name.is_empty() {
                let mut lora = LoraRef::new(name);
                lora.weight = parts.next().and_then(|w| w.trim().parse().ok());
                lora.clip_weight = parts.next().and_then(|w| w.trim().parse().ok());
                record.push_lora(lora);
            }
        }
        rest = &after[end + 1..];
    }
}
