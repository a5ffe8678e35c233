//! BZip2 sector decoding

use crate::{Error, Result};
use bzip2::read::BzDecoder;
use std::io::Read;

/// Decompress one BZip2 stream into exactly `expected_size` bytes
///
/// Decoding stops one byte past `expected_size`, so an oversized stream is
/// reported without being inflated in full.
pub(crate) fn decompress(data: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    let mut decoder = BzDecoder::new(data).take(expected_size as u64 + 1);
    let mut decompressed = Vec::with_capacity(expected_size);

    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| Error::compression(format!("BZip2 decompression failed: {e}")))?;

    if decompressed.len() != expected_size {
        return Err(Error::compression(format!(
            "Decompressed size mismatch: expected {}, got {}",
            expected_size,
            decompressed.len()
        )));
    }

    Ok(decompressed)
}
