//! Error types for the MPQ reader

use crate::compression::CompressionMethod;
use std::io;
use thiserror::Error;

/// Result type alias for MPQ operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for MPQ operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while loading an archive from disk
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No offset in the buffer holds a parseable MPQ header
    #[error("No MPQ header found")]
    HeaderNotFound,

    /// The candidate header does not start with `MPQ\x1A`
    #[error("Invalid MPQ header signature at offset 0x{offset:X}: got 0x{found:08X}")]
    BadSignature {
        /// Offset that was probed
        offset: usize,
        /// Signature word found there
        found: u32,
    },

    /// Header reports a format version or extension fields this reader rejects
    #[error("Unsupported MPQ version: {0}")]
    UnsupportedVersion(u16),

    /// A hash or block table extends past the end of the buffer
    #[error("Truncated {table}: needs {needed} bytes at its position, {available} available")]
    TruncatedTable {
        /// Table name
        table: &'static str,
        /// Bytes the table occupies
        needed: u64,
        /// Bytes left in the buffer from the table position
        available: u64,
    },

    /// A reader ran out of input
    #[error("Truncated read: {needed} more bytes needed at position {position}")]
    TruncatedRead {
        /// Byte position of the failed read
        position: usize,
        /// Number of bytes that were missing
        needed: usize,
    },

    /// Both hash probe passes failed to match the name
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// An encrypted sector was requested before the entry had a name
    #[error("Unable to determine encryption key for {0}")]
    UnknownEncryptionKey(String),

    /// Sector compression method is not implemented
    #[error("Unsupported compression: {0}")]
    UnsupportedCodec(CompressionMethod),

    /// A pattern scan reached the end of the buffer without a match
    #[error("Seek failed: pattern not found before end of buffer")]
    SeekFailed,

    /// Decoder failure for an implemented codec
    #[error("Compression error: {0}")]
    Compression(String),

    /// Structurally invalid archive data
    #[error("Invalid MPQ format: {0}")]
    InvalidFormat(String),
}

impl Error {
    /// Create a new InvalidFormat error
    pub fn invalid_format<S: Into<String>>(msg: S) -> Self {
        Error::InvalidFormat(msg.into())
    }

    /// Create a new Compression error
    pub fn compression<S: Into<String>>(msg: S) -> Self {
        Error::Compression(msg.into())
    }

    /// Check if this error aborts archive construction
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Error::HeaderNotFound
                | Error::BadSignature { .. }
                | Error::UnsupportedVersion(_)
                | Error::TruncatedTable { .. }
        )
    }

    /// Check if the archive stays usable after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::FileNotFound(_) | Error::UnknownEncryptionKey(_) | Error::UnsupportedCodec(_)
        )
    }
}
