//! Sector decompression for MPQ files
//!
//! Every compressed sector of a `COMPRESS` entry starts with a one-byte
//! method tag. Only BZip2 is decoded; the remaining methods are recognized
//! so callers get an [`Error::UnsupportedCodec`](crate::Error::UnsupportedCodec)
//! naming the exact method.

mod algorithms;
mod decompress;
mod methods;

pub use decompress::decompress_sector;
pub use methods::{CompressionMethod, tags};
