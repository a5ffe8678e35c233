//! Tag dispatch for compressed sectors

use super::algorithms;
use super::methods::CompressionMethod;
use crate::{Error, Result};

/// Decompress one `COMPRESS` sector
///
/// `data` is the stored sector including its leading method tag; the result
/// is exactly `expected_size` bytes long.
pub fn decompress_sector(data: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    let (&tag, payload) = data
        .split_first()
        .ok_or_else(|| Error::compression("Empty compressed data"))?;

    let method = CompressionMethod::from_tag(tag);

    log::debug!(
        "Decompressing {} bytes to {} bytes with {}",
        payload.len(),
        expected_size,
        method
    );

    match method {
        CompressionMethod::BZip2 => algorithms::bzip2::decompress(payload, expected_size),
        unsupported => Err(Error::UnsupportedCodec(unsupported)),
    }
}
