//! Compression method tags

use std::fmt;

/// Method tags found in the first byte of a `COMPRESS` sector
pub mod tags {
    /// Huffman encoding (WAVE files only)
    pub const HUFFMAN: u8 = 0x01;
    /// Deflate/zlib compression
    pub const ZLIB: u8 = 0x02;
    /// PKWare DCL compression
    pub const PKWARE: u8 = 0x08;
    /// BZip2 compression
    pub const BZIP2: u8 = 0x10;
    /// LZMA compression (not a flag combination)
    pub const LZMA: u8 = 0x12;
    /// Sparse, then zlib
    pub const SPARSE_ZLIB: u8 = 0x22;
    /// Sparse, then BZip2
    pub const SPARSE_BZIP2: u8 = 0x30;
    /// IMA ADPCM mono
    pub const ADPCM_MONO: u8 = 0x40;
    /// Huffman, then IMA ADPCM mono
    pub const HUFFMAN_ADPCM_MONO: u8 = 0x41;
    /// PKWare, then IMA ADPCM mono
    pub const PKWARE_ADPCM_MONO: u8 = 0x48;
    /// IMA ADPCM stereo
    pub const ADPCM_STEREO: u8 = 0x80;
    /// Huffman, then IMA ADPCM stereo
    pub const HUFFMAN_ADPCM_STEREO: u8 = 0x81;
    /// PKWare, then IMA ADPCM stereo
    pub const PKWARE_ADPCM_STEREO: u8 = 0x88;
}

/// A sector compression method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    /// Huffman encoding
    Huffman,
    /// Deflate/zlib
    Zlib,
    /// PKWare DCL
    PKWare,
    /// BZip2
    BZip2,
    /// LZMA
    Lzma,
    /// Sparse followed by zlib
    SparseZlib,
    /// Sparse followed by BZip2
    SparseBzip2,
    /// IMA ADPCM mono
    AdpcmMono,
    /// Huffman followed by IMA ADPCM mono
    HuffmanAdpcmMono,
    /// PKWare followed by IMA ADPCM mono
    PKWareAdpcmMono,
    /// IMA ADPCM stereo
    AdpcmStereo,
    /// Huffman followed by IMA ADPCM stereo
    HuffmanAdpcmStereo,
    /// PKWare followed by IMA ADPCM stereo
    PKWareAdpcmStereo,
    /// Whole-entry PKWare implode (`IMPLODE` block flag, no tag byte)
    Implode,
    /// Any other tag byte
    Unknown(u8),
}

impl CompressionMethod {
    /// Map a sector tag byte to its method
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            tags::HUFFMAN => CompressionMethod::Huffman,
            tags::ZLIB => CompressionMethod::Zlib,
            tags::PKWARE => CompressionMethod::PKWare,
            tags::BZIP2 => CompressionMethod::BZip2,
            tags::LZMA => CompressionMethod::Lzma,
            tags::SPARSE_ZLIB => CompressionMethod::SparseZlib,
            tags::SPARSE_BZIP2 => CompressionMethod::SparseBzip2,
            tags::ADPCM_MONO => CompressionMethod::AdpcmMono,
            tags::HUFFMAN_ADPCM_MONO => CompressionMethod::HuffmanAdpcmMono,
            tags::PKWARE_ADPCM_MONO => CompressionMethod::PKWareAdpcmMono,
            tags::ADPCM_STEREO => CompressionMethod::AdpcmStereo,
            tags::HUFFMAN_ADPCM_STEREO => CompressionMethod::HuffmanAdpcmStereo,
            tags::PKWARE_ADPCM_STEREO => CompressionMethod::PKWareAdpcmStereo,
            other => CompressionMethod::Unknown(other),
        }
    }

    /// The tag byte for this method, `None` for whole-entry implode
    pub fn tag(&self) -> Option<u8> {
        let tag = match self {
            CompressionMethod::Huffman => tags::HUFFMAN,
            CompressionMethod::Zlib => tags::ZLIB,
            CompressionMethod::PKWare => tags::PKWARE,
            CompressionMethod::BZip2 => tags::BZIP2,
            CompressionMethod::Lzma => tags::LZMA,
            CompressionMethod::SparseZlib => tags::SPARSE_ZLIB,
            CompressionMethod::SparseBzip2 => tags::SPARSE_BZIP2,
            CompressionMethod::AdpcmMono => tags::ADPCM_MONO,
            CompressionMethod::HuffmanAdpcmMono => tags::HUFFMAN_ADPCM_MONO,
            CompressionMethod::PKWareAdpcmMono => tags::PKWARE_ADPCM_MONO,
            CompressionMethod::AdpcmStereo => tags::ADPCM_STEREO,
            CompressionMethod::HuffmanAdpcmStereo => tags::HUFFMAN_ADPCM_STEREO,
            CompressionMethod::PKWareAdpcmStereo => tags::PKWARE_ADPCM_STEREO,
            CompressionMethod::Implode => return None,
            CompressionMethod::Unknown(tag) => *tag,
        };
        Some(tag)
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag() {
            None => write!(f, "PKWare implode"),
            Some(tag) => match self {
                CompressionMethod::Unknown(_) => write!(f, "Unknown (0x{tag:02X})"),
                known => write!(f, "{known:?} (0x{tag:02X})"),
            },
        }
    }
}
