//! MPQ header location and parsing

use crate::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

/// MPQ archive header signature ('MPQ\x1A')
pub const MPQ_HEADER_SIGNATURE: u32 = 0x1A51504D;

/// Size of the original header record
pub const HEADER_SIZE: usize = 0x20;

/// Size of the header record when the version-1 extension is present
pub const HEADER_SIZE_V1: usize = 0x2C;

/// Data offset written by some map protectors in place of the header size
pub const PROTECTED_DATA_OFFSET: u32 = 0x6D9E4B86;

/// Largest sector size shift whose sector size still fits in 32 bits
const MAX_SECTOR_SHIFT: u16 = 22;

/// Main MPQ header structure
///
/// Table positions are absolute within the host buffer once
/// [`apply_header_offset`](Self::apply_header_offset) has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MpqHeader {
    /// Header signature, always [`MPQ_HEADER_SIGNATURE`]
    pub signature: u32,
    /// Offset of the header within the host buffer
    pub header_offset: u64,
    /// Offset of the file data, relative to the header
    pub data_offset: u64,
    /// Size of the archive as recorded by its writer
    pub archive_size: u32,
    /// Format version (only 0 is supported)
    pub format_version: u16,
    /// Sector size shift: sector size is `0x200 << sector_shift`
    pub sector_shift: u16,
    /// Position of the hash table
    pub hash_table_pos: u64,
    /// Position of the block table
    pub block_table_pos: u64,
    /// Number of entries in the hash table
    pub hash_table_size: u32,
    /// Number of entries in the block table
    pub block_table_size: u32,

    // Version 1 extension
    /// Offset of the extended block table
    pub extended_block_table_offset: i64,
    /// High 16 bits of the hash table position
    pub hash_table_pos_hi: i16,
    /// High 16 bits of the block table position
    pub block_table_pos_hi: i16,
}

impl MpqHeader {
    /// Scan `data` for the first offset holding a valid header
    ///
    /// The returned header already has its offset applied. Offsets from 0
    /// up to (excluding) `data.len() - HEADER_SIZE` are considered.
    pub fn locate(data: &[u8]) -> Result<Self> {
        let scan_end = data.len().saturating_sub(HEADER_SIZE);
        let signature = MPQ_HEADER_SIGNATURE.to_le_bytes();

        for offset in memchr::memmem::find_iter(data, &signature) {
            if offset >= scan_end {
                break;
            }

            match Self::parse(data, offset) {
                Ok(mut header) => {
                    header.apply_header_offset(offset as u64);
                    log::debug!(
                        "Found MPQ header at offset 0x{offset:X} (version {}, {} hash entries, {} block entries)",
                        header.format_version,
                        header.hash_table_size,
                        header.block_table_size
                    );
                    return Ok(header);
                }
                Err(e) => log::trace!("Rejected header candidate at 0x{offset:X}: {e}"),
            }
        }

        Err(Error::HeaderNotFound)
    }

    /// Parse a header record at `offset`, without applying the offset
    pub fn parse(data: &[u8], offset: usize) -> Result<Self> {
        let record = data.get(offset..).unwrap_or_default();
        if record.len() < HEADER_SIZE {
            return Err(Error::TruncatedRead {
                position: offset,
                needed: HEADER_SIZE - record.len(),
            });
        }

        let mut reader = Cursor::new(record);
        let signature = reader.read_u32::<LittleEndian>()?;
        if signature != MPQ_HEADER_SIGNATURE {
            return Err(Error::BadSignature {
                offset,
                found: signature,
            });
        }

        let mut header = MpqHeader {
            signature,
            header_offset: 0,
            data_offset: reader.read_u32::<LittleEndian>()? as u64,
            archive_size: reader.read_u32::<LittleEndian>()?,
            format_version: reader.read_u16::<LittleEndian>()?,
            sector_shift: reader.read_u16::<LittleEndian>()?,
            hash_table_pos: reader.read_u32::<LittleEndian>()? as u64,
            block_table_pos: reader.read_u32::<LittleEndian>()? as u64,
            hash_table_size: reader.read_u32::<LittleEndian>()?,
            block_table_size: reader.read_u32::<LittleEndian>()?,
            extended_block_table_offset: 0,
            hash_table_pos_hi: 0,
            block_table_pos_hi: 0,
        };

        if header.format_version == 1 {
            if record.len() < HEADER_SIZE_V1 {
                return Err(Error::TruncatedRead {
                    position: offset + record.len(),
                    needed: HEADER_SIZE_V1 - record.len(),
                });
            }
            header.extended_block_table_offset = reader.read_i64::<LittleEndian>()?;
            header.hash_table_pos_hi = reader.read_i16::<LittleEndian>()?;
            header.block_table_pos_hi = reader.read_i16::<LittleEndian>()?;
        }

        Ok(header)
    }

    /// Rebase table positions on the header's location in the host buffer
    pub fn apply_header_offset(&mut self, header_offset: u64) {
        self.header_offset = header_offset;
        self.hash_table_pos += header_offset;
        self.block_table_pos += header_offset;
        if self.data_offset == PROTECTED_DATA_OFFSET as u64 {
            self.data_offset = HEADER_SIZE as u64 + header_offset;
        }
    }

    /// Reject archives that need the 64-bit table extension
    ///
    /// Version 1 always fails. Later versions are read through their
    /// leading 32-byte record.
    pub fn validate(&self) -> Result<()> {
        if self.format_version == 1
            || self.extended_block_table_offset != 0
            || self.hash_table_pos_hi != 0
            || self.block_table_pos_hi != 0
        {
            return Err(Error::UnsupportedVersion(self.format_version));
        }

        if self.sector_shift > MAX_SECTOR_SHIFT {
            return Err(Error::invalid_format(format!(
                "Sector size shift {} is too large",
                self.sector_shift
            )));
        }

        Ok(())
    }

    /// Size of one sector in bytes
    pub fn sector_size(&self) -> usize {
        0x200 << self.sector_shift
    }
}
