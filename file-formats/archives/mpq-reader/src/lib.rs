//! # mpq_reader - MPQ Archive Reader
//!
//! A safe, read-only Rust implementation of the MPQ (Mo'PaQ) archive format
//! in its original (version 0) layout, as found in Warcraft III maps and
//! early Blizzard titles.
//!
//! ## Features
//!
//! - Header location anywhere in a host buffer, including protected maps
//! - Hash and block table decryption
//! - Sector streaming with per-sector decryption and BZip2 decompression
//! - Name bootstrapping from the `(listfile)`
//! - A bit reader for parsing the binary files stored inside archives
//!
//! ## Examples
//!
//! ```no_run
//! use mpq_reader::OpenOptions;
//! use std::io::Read;
//!
//! # fn main() -> Result<(), mpq_reader::Error> {
//! // Load a map and name its files from the listfile
//! let archive = OpenOptions::new().open("map.w3x")?;
//!
//! for name in archive.list() {
//!     println!("{name}");
//! }
//!
//! // Read a file in one go
//! let script = archive.read_file("war3map.j")?;
//!
//! // Or stream it
//! let mut stream = archive.open("war3map.w3i")?;
//! let mut info = Vec::new();
//! stream.read_to_end(&mut info)?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod archive;
pub mod compression;
pub mod crypto;
pub mod error;
pub mod header;
pub mod io;
pub mod stream;
pub mod tables;

pub use archive::{Archive, LISTFILE, OpenOptions};
pub use compression::CompressionMethod;
pub use error::{Error, Result};
pub use header::MpqHeader;
pub use io::{BitReader, Endian};
pub use stream::SectorStream;
pub use tables::{BlockEntry, BlockFlags, BlockTable, HashEntry, HashTable};

// Re-export commonly used crypto functions
pub use crypto::{decrypt_block, encrypt_block, file_key, hash_string, hash_type};

/// MPQ signature constants
pub mod signatures {
    /// Standard MPQ archive signature ('MPQ\x1A')
    pub const MPQ_ARCHIVE: u32 = 0x1A51504D;

    /// Data offset value left by map protectors
    pub const PROTECTED_DATA_OFFSET: u32 = 0x6D9E4B86;
}
