//! Hash table implementation for MPQ archives

use super::common::{ENTRY_SIZE, read_table};
use crate::crypto::{hash_string, hash_type};
use crate::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

/// Hash table entry (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashEntry {
    /// The hash of the full file name (part A)
    pub name_1: u32,
    /// The hash of the full file name (part B)
    pub name_2: u32,
    /// Locale and platform word, kept as stored
    pub locale: u32,
    /// Block table index or special value
    pub block_index: u32,
}

impl HashEntry {
    /// Value indicating the hash entry has never been used
    pub const EMPTY_NEVER_USED: u32 = 0xFFFFFFFF;
    /// Value indicating the hash entry was deleted
    pub const EMPTY_DELETED: u32 = 0xFFFFFFFE;

    /// Check if this entry has never been used
    pub fn is_empty(&self) -> bool {
        self.block_index == Self::EMPTY_NEVER_USED
    }

    /// Check if this entry was deleted
    pub fn is_deleted(&self) -> bool {
        self.block_index == Self::EMPTY_DELETED
    }

    /// Check if this entry points at a block
    pub fn is_valid(&self) -> bool {
        self.block_index < Self::EMPTY_DELETED
    }

    /// Read a hash entry from raw (decrypted) bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < ENTRY_SIZE {
            return Err(Error::invalid_format("Hash entry too small"));
        }

        let mut cursor = Cursor::new(data);
        Ok(Self {
            name_1: cursor.read_u32::<LittleEndian>()?,
            name_2: cursor.read_u32::<LittleEndian>()?,
            locale: cursor.read_u32::<LittleEndian>()?,
            block_index: cursor.read_u32::<LittleEndian>()?,
        })
    }
}

/// Hash table
#[derive(Debug, Clone, Default)]
pub struct HashTable {
    entries: Vec<HashEntry>,
}

impl HashTable {
    /// Build a table from already parsed entries
    ///
    /// Any size is accepted. Masking keeps the start slot in range and the
    /// probe visits every slot, so odd sizes still resolve.
    pub fn from_entries(entries: Vec<HashEntry>) -> Self {
        if !entries.is_empty() && !entries.len().is_power_of_two() {
            log::debug!("Hash table size {} is not a power of 2", entries.len());
        }

        Self { entries }
    }

    /// Read and decrypt the hash table from an archive buffer
    pub fn read(data: &[u8], pos: u64, count: u32) -> Result<Self> {
        let raw = read_table(data, "hash table", "(hash table)", pos, count)?;
        let entries = raw
            .chunks_exact(ENTRY_SIZE)
            .map(HashEntry::from_bytes)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_entries(entries))
    }

    /// Get all entries
    pub fn entries(&self) -> &[HashEntry] {
        &self.entries
    }

    /// Get a specific entry
    pub fn get(&self, index: usize) -> Option<&HashEntry> {
        self.entries.get(index)
    }

    /// Number of slots in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no slots
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the entry for a file name
    pub fn find(&self, filename: &str) -> Option<&HashEntry> {
        if self.entries.is_empty() {
            return None;
        }

        let start = hash_string(filename, hash_type::TABLE_OFFSET) as usize & (self.len() - 1);
        self.find_by_hashes(
            start,
            hash_string(filename, hash_type::NAME_A),
            hash_string(filename, hash_type::NAME_B),
        )
    }

    /// Probe from `start` to the end of the table, then from the beginning
    /// up to `start`, returning the first slot whose name hashes match
    ///
    /// Empty and deleted slots do not end the probe.
    pub fn find_by_hashes(&self, start: usize, name_1: u32, name_2: u32) -> Option<&HashEntry> {
        let start = start.min(self.entries.len());
        let (head, tail) = self.entries.split_at(start);

        tail.iter()
            .chain(head)
            .find(|entry| entry.name_1 == name_1 && entry.name_2 == name_2)
    }
}
