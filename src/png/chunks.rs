//! PNG chunk walker
//!
//! PNG chunks are length-prefixed typed blocks: 4-byte big-endian length,
//! 4-byte ASCII type, `length` data bytes, 4-byte CRC. Text metadata lives
//! in three chunk types:
//!
//! - `tEXt`: `keyword\0text`, both Latin-1
//! - `zTXt`: `keyword\0 method(1) compressed-text`
//! - `iTXt`: `keyword\0 flag(1) method(1) language\0 translated-keyword\0 text`
//!
//! CRCs are not validated — the pixel data is never touched, so a bad
//! checksum on a chunk we can still read is not worth rejecting.

use std::collections::HashMap;

use tracing::{debug, trace};

use super::inflate::{Inflate, ZlibInflater};

/// Keyword → decoded text, in file order with last-occurrence-wins on
/// duplicate keywords.
pub type TextChunkMap = HashMap<String, String>;

/// PNG file signature (8 bytes).
const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Extract all text chunks from a PNG byte buffer.
///
/// Returns an empty map for non-PNG input and a partial map for truncated
/// or otherwise malformed files; never fails.
pub fn read_text_chunks(bytes: &[u8]) -> TextChunkMap {
    read_text_chunks_with(bytes, &ZlibInflater)
}

/// Extract all text chunks, using the given inflater for compressed chunks.
///
/// A chunk whose inflation fails (or whose compression method is unknown)
/// is omitted; the walk continues with the next chunk.
pub fn read_text_chunks_with(bytes: &[u8], inflater: &dyn Inflate) -> TextChunkMap {
    let mut chunks = TextChunkMap::new();

    if bytes.len() < PNG_SIGNATURE.len() || bytes[..PNG_SIGNATURE.len()] != PNG_SIGNATURE {
        debug!("buffer does not start with a PNG signature");
        return chunks;
    }

    let mut offset = PNG_SIGNATURE.len();
    // Each iteration needs a complete 8-byte chunk header.
    while offset + 8 <= bytes.len() {
        let length = u32::from_be_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ]) as usize;
        let tag = &bytes[offset + 4..offset + 8];

        let data_start = offset + 8;
        let data_end = match data_start.checked_add(length) {
            Some(end) if end <= bytes.len() => end,
            // Chunk claims to extend past the buffer: stop walking, keep
            // what was already gathered.
            _ => {
                debug!(length, "chunk extends past end of buffer");
                break;
            }
        };

        if tag == b"IEND" {
            break;
        }

        let data = &bytes[data_start..data_end];
        match tag {
            b"tEXt" => parse_text(data, &mut chunks),
            b"zTXt" => parse_ztxt(data, inflater, &mut chunks),
            b"iTXt" => parse_itxt(data, inflater, &mut chunks),
            _ => {}
        }

        // Skip data and the 4-byte CRC.
        offset = data_end + 4;
    }

    chunks
}

/// Decode Latin-1 bytes; every byte value maps to the same code point.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Split chunk data at the first NUL into (keyword, rest).
fn split_keyword(data: &[u8]) -> Option<(String, &[u8])> {
    let nul = data.iter().position(|&b| b == 0)?;
    let keyword = latin1(&data[..nul]);
    if keyword.is_empty() {
        return None;
    }
    Some((keyword, &data[nul + 1..]))
}

/// `tEXt`: keyword and text, both Latin-1.
fn parse_text(data: &[u8], chunks: &mut TextChunkMap) {
    let Some((keyword, text)) = split_keyword(data) else {
        return;
    };
    trace!(%keyword, "tEXt chunk");
    chunks.insert(keyword, latin1(text));
}

/// `zTXt`: keyword, one method byte, zlib-compressed text.
fn parse_ztxt(data: &[u8], inflater: &dyn Inflate, chunks: &mut TextChunkMap) {
    let Some((keyword, rest)) = split_keyword(data) else {
        return;
    };
    let Some((&method, compressed)) = rest.split_first() else {
        return;
    };
    if method != 0 {
        debug!(%keyword, method, "unknown zTXt compression method, dropping key");
        return;
    }
    match inflater.inflate(compressed) {
        Ok(raw) => {
            trace!(%keyword, "zTXt chunk");
            chunks.insert(keyword, String::from_utf8_lossy(&raw).into_owned());
        }
        Err(err) => debug!(%keyword, %err, "zTXt inflate failed, dropping key"),
    }
}

/// `iTXt`: keyword, flag and method bytes, language tag, translated
/// keyword, then UTF-8 text (compressed when the flag is set).
fn parse_itxt(data: &[u8], inflater: &dyn Inflate, chunks: &mut TextChunkMap) {
    let Some((keyword, rest)) = split_keyword(data) else {
        return;
    };
    let [flag, method, tail @ ..] = rest else {
        return;
    };

    // Language tag, then translated keyword, both NUL-terminated.
    let Some(lang_end) = tail.iter().position(|&b| b == 0) else {
        return;
    };
    let after_lang = &tail[lang_end + 1..];
    let Some(translated_end) = after_lang.iter().position(|&b| b == 0) else {
        return;
    };
    let text_bytes = &after_lang[translated_end + 1..];

    if *flag != 0 && *method == 0 {
        match inflater.inflate(text_bytes) {
            Ok(raw) => {
                trace!(%keyword, "compressed iTXt chunk");
                chunks.insert(keyword, String::from_utf8_lossy(&raw).into_owned());
            }
            Err(err) => debug!(%keyword, %err, "iTXt inflate failed, dropping key"),
        }
    } else {
        trace!(%keyword, "iTXt chunk");
        chunks.insert(keyword, String::from_utf8_lossy(text_bytes).into_owned());
    }
}
