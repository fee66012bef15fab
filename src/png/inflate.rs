//! Injected DEFLATE capability
//!
//! Compressed text chunks are rare and the reader must keep working when
//! decompression is unavailable, so inflation is a pluggable capability
//! rather than a hard-wired call. Inflate failures never escape the chunk
//! reader; the affected key is dropped and the walk continues.

use std::io::Read;

use thiserror::Error;

/// Errors from an [`Inflate`] implementation.
#[derive(Debug, Error)]
pub enum InflateError {
    #[error("decompression is not available in this configuration")]
    Unavailable,

    #[error("corrupt zlib stream: {0}")]
    Corrupt(String),
}

/// Decompress a zlib (RFC 1950) stream.
///
/// Implementations must be pure: same bytes in, same bytes (or error) out.
pub trait Inflate {
    fn inflate(&self, bytes: &[u8]) -> Result<Vec<u8>, InflateError>;
}

/// Production inflater backed by flate2's zlib decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZlibInflater;

impl Inflate for ZlibInflater {
    fn inflate(&self, bytes: &[u8]) -> Result<Vec<u8>, InflateError> {
        let mut decoder = flate2::read::ZlibDecoder::new(bytes);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|e| InflateError::Corrupt(e.to_string()))?;
        Ok(out)
    }
}

/// Inflater that refuses every stream.
///
/// With this capability installed, compressed chunks are simply omitted
/// from the chunk map while plain `tEXt` chunks still come through.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInflate;

impl Inflate for NoInflate {
    fn inflate(&self, _bytes: &[u8]) -> Result<Vec<u8>, InflateError> {
        Err(InflateError::Unavailable)
    }
}
