//! Shared synthetic-PNG fixtures for extraction tests
//!
//! Builds byte-accurate PNG files in memory: real signature, length/type
//! framing, and genuine CRCs, with zlib compression for the compressed
//! chunk variants.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

/// PNG file signature (8 bytes).
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Frame one chunk: length, type, data, CRC over type+data.
pub fn chunk(tag: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 12);
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(data);
    let mut crc = flate2::Crc::new();
    crc.update(tag);
    crc.update(data);
    out.extend_from_slice(&crc.sum().to_be_bytes());
    out
}

/// Assemble a PNG: signature, the given chunks, then IEND.
pub fn png(chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut out = PNG_SIGNATURE.to_vec();
    for c in chunks {
        out.extend_from_slice(c);
    }
    out.extend_from_slice(&chunk(b"IEND", &[]));
    out
}

/// A `tEXt` chunk: `keyword\0text`.
pub fn text_chunk(keyword: &str, text: &str) -> Vec<u8> {
    let mut data = keyword.as_bytes().to_vec();
    data.push(0);
    data.extend_from_slice(text.as_bytes());
    chunk(b"tEXt", &data)
}

/// A `zTXt` chunk: `keyword\0 method compressed-text`.
pub fn ztxt_chunk(keyword: &str, method: u8, text: &str) -> Vec<u8> {
    let mut data = keyword.as_bytes().to_vec();
    data.push(0);
    data.push(method);
    data.extend_from_slice(&deflate(text.as_bytes()));
    chunk(b"zTXt", &data)
}

/// An `iTXt` chunk with empty language/translated-keyword fields.
pub fn itxt_chunk(keyword: &str, compressed: bool, text: &str) -> Vec<u8> {
    let mut data = keyword.as_bytes().to_vec();
    data.push(0);
    data.push(u8::from(compressed));
    data.push(0); // method 0 = zlib
    data.extend_from_slice(b"\0\0");
    if compressed {
        data.extend_from_slice(&deflate(text.as_bytes()));
    } else {
        data.extend_from_slice(text.as_bytes());
    }
    chunk(b"iTXt", &data)
}

/// zlib-compress a byte string.
pub fn deflate(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}
