//! Block table implementation for MPQ archives

use super::common::{ENTRY_SIZE, read_table};
use crate::crypto::file_key;
use crate::{Error, Result};
use bitflags::bitflags;
use byteorder::{LittleEndian, ReadBytesExt};
use std::fmt;
use std::io::Cursor;
use std::sync::OnceLock;

bitflags! {
    /// Flags for a block table entry
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BlockFlags: u32 {
        /// File is compressed using PKWARE Data compression library
        const IMPLODE = 0x0000_0100;
        /// File sectors carry a compression method tag
        const COMPRESS = 0x0000_0200;
        /// Any compression bit
        const COMPRESSED = 0x0000_FF00;
        /// File is encrypted
        const ENCRYPTED = 0x0001_0000;
        /// The decryption key for the file is adjusted by the block position
        const FIX_KEY = 0x0002_0000;
        /// File is stored as a single unit, not split into sectors
        const SINGLE_UNIT = 0x0100_0000;
        /// File has a trailing checksum sector
        const SECTOR_CRC = 0x0400_0000;
        /// File exists in the archive
        const EXISTS = 0x8000_0000;
    }
}

#[derive(Debug, Clone)]
struct AssignedName {
    name: String,
    seed: u32,
}

/// Block table entry (16 bytes on disk)
///
/// An entry starts out unnamed. The first name assigned through
/// [`set_filename`](Self::set_filename) sticks, together with the
/// encryption seed derived from it.
#[derive(Debug, Clone)]
pub struct BlockEntry {
    /// Offset of the file data, relative to the archive header
    pub file_offset: u32,
    /// Absolute position of the file data in the host buffer
    pub file_pos: u64,
    /// Compressed file size
    pub compressed_size: u32,
    /// Size of uncompressed file
    pub file_size: u32,
    /// Flags for the file
    pub flags: BlockFlags,
    name: OnceLock<AssignedName>,
}

impl BlockEntry {
    /// Create an unnamed entry
    pub fn new(
        file_offset: u32,
        header_offset: u64,
        compressed_size: u32,
        file_size: u32,
        flags: BlockFlags,
    ) -> Self {
        Self {
            file_offset,
            file_pos: u64::from(file_offset) + header_offset,
            compressed_size,
            file_size,
            flags,
            name: OnceLock::new(),
        }
    }

    /// Read a block entry from raw (decrypted) bytes
    pub fn from_bytes(data: &[u8], header_offset: u64) -> Result<Self> {
        if data.len() < ENTRY_SIZE {
            return Err(Error::invalid_format("Block entry too small"));
        }

        let mut cursor = Cursor::new(data);
        let file_offset = cursor.read_u32::<LittleEndian>()?;
        let compressed_size = cursor.read_u32::<LittleEndian>()?;
        let file_size = cursor.read_u32::<LittleEndian>()?;
        let flags = BlockFlags::from_bits_retain(cursor.read_u32::<LittleEndian>()?);

        Ok(Self::new(
            file_offset,
            header_offset,
            compressed_size,
            file_size,
            flags,
        ))
    }

    /// Assign the entry's name and derive its encryption seed
    ///
    /// Returns `true` if this call assigned the name, `false` if the entry
    /// was already named (the existing name is kept).
    pub fn set_filename(&self, name: &str) -> bool {
        let mut assigned = false;
        self.name.get_or_init(|| {
            assigned = true;
            AssignedName {
                name: name.to_string(),
                seed: file_key(name, self.file_offset, self.file_size, self.has_fix_key()),
            }
        });
        assigned
    }

    /// The assigned name, if any
    pub fn filename(&self) -> Option<&str> {
        self.name.get().map(|assigned| assigned.name.as_str())
    }

    /// Encryption seed derived from the name, 0 while unnamed
    pub fn encryption_seed(&self) -> u32 {
        self.name.get().map_or(0, |assigned| assigned.seed)
    }

    /// Check if the file is compressed by any method
    pub fn is_compressed(&self) -> bool {
        self.flags.intersects(BlockFlags::COMPRESSED)
    }

    /// Check if sectors carry a compression method tag
    pub fn is_multi_compressed(&self) -> bool {
        self.flags.contains(BlockFlags::COMPRESS)
    }

    /// Check if the file is PKWare imploded
    pub fn is_imploded(&self) -> bool {
        self.flags.contains(BlockFlags::IMPLODE)
    }

    /// Check if the file is encrypted
    pub fn is_encrypted(&self) -> bool {
        self.flags.contains(BlockFlags::ENCRYPTED)
    }

    /// Check if the file uses an offset-adjusted key
    pub fn has_fix_key(&self) -> bool {
        self.flags.contains(BlockFlags::FIX_KEY)
    }

    /// Check if the file is stored as a single unit
    pub fn is_single_unit(&self) -> bool {
        self.flags.contains(BlockFlags::SINGLE_UNIT)
    }

    /// Check if the file has a checksum sector
    pub fn has_sector_crc(&self) -> bool {
        self.flags.contains(BlockFlags::SECTOR_CRC)
    }

    /// Check if the slot is in use (any flag set)
    pub fn exists(&self) -> bool {
        !self.flags.is_empty()
    }
}

impl fmt::Display for BlockEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.filename() {
            Some(name) => f.write_str(name),
            None if self.exists() => write!(f, "Unknown file @ 0x{:x}", self.file_pos),
            None => f.write_str("(Deleted file)"),
        }
    }
}

/// Block table
#[derive(Debug, Clone, Default)]
pub struct BlockTable {
    entries: Vec<BlockEntry>,
}

impl BlockTable {
    /// Read and decrypt the block table from an archive buffer
    pub fn read(data: &[u8], pos: u64, count: u32, header_offset: u64) -> Result<Self> {
        let raw = read_table(data, "block table", "(block table)", pos, count)?;
        let entries = raw
            .chunks_exact(ENTRY_SIZE)
            .map(|record| BlockEntry::from_bytes(record, header_offset))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    /// Get all entries
    pub fn entries(&self) -> &[BlockEntry] {
        &self.entries
    }

    /// Get a specific entry
    pub fn get(&self, index: usize) -> Option<&BlockEntry> {
        self.entries.get(index)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
