//! Sector-wise reading of a single archive member

use crate::compression::{CompressionMethod, decompress_sector};
use crate::crypto::decrypt_block;
use crate::tables::BlockEntry;
use crate::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Cursor, Read, Seek, SeekFrom};

/// Reader over one file stored in an archive
///
/// Sectors are loaded on demand and the most recent one is kept decoded.
/// Besides the offset-based [`read_at`](Self::read_at) the stream implements
/// [`std::io::Read`] and [`std::io::Seek`] over the same cache.
#[derive(Debug)]
pub struct SectorStream<'a> {
    data: &'a [u8],
    entry: &'a BlockEntry,
    sector_size: usize,
    boundaries: Vec<u32>,
    cached: Option<(usize, Vec<u8>)>,
    position: u64,
}

impl<'a> SectorStream<'a> {
    /// Prepare a stream for `entry` inside the archive buffer `data`
    ///
    /// `sector_size` is the archive-wide sector size from the header.
    pub fn new(data: &'a [u8], entry: &'a BlockEntry, sector_size: usize) -> Result<Self> {
        let mut stream = Self {
            data,
            entry,
            sector_size,
            boundaries: vec![0, entry.compressed_size],
            cached: None,
            position: 0,
        };

        if entry.is_compressed() {
            if entry.is_single_unit() {
                stream.sector_size = entry.file_size as usize;
            } else if entry.file_size > 0 {
                stream.boundaries = stream.load_boundaries()?;
            }
        }

        log::debug!(
            "Opened {}: {} bytes in {} sectors of {} bytes",
            entry,
            entry.file_size,
            stream.sector_count(),
            stream.sector_size
        );

        Ok(stream)
    }

    /// Read the sector offset table that precedes compressed file data
    fn load_boundaries(&self) -> Result<Vec<u32>> {
        let mut count = self.sector_count() + 1;
        if self.entry.has_sector_crc() {
            count += 1;
        }

        let mut table = self.slice(0, count * 4)?.to_vec();
        if self.entry.is_encrypted() && self.entry.file_size > 3 {
            let seed = self.require_seed()?;
            decrypt_block(&mut table, seed.wrapping_sub(1));
        }

        let mut cursor = Cursor::new(&table);
        let boundaries = (0..count)
            .map(|_| cursor.read_u32::<LittleEndian>())
            .collect::<io::Result<Vec<_>>>()?;

        log::debug!(
            "Sector boundaries for {}: first={}, last={}",
            self.entry,
            boundaries.first().copied().unwrap_or(0),
            boundaries.last().copied().unwrap_or(0)
        );

        Ok(boundaries)
    }

    /// Decode sector `index`, which should yield `expected` bytes
    pub fn load_sector(&self, index: usize, expected: usize) -> Result<Vec<u8>> {
        let (start, length) = if self.entry.is_compressed() {
            let start = self.boundary(index)?;
            let end = self.boundary(index + 1)?;
            if end < start {
                return Err(Error::invalid_format(format!(
                    "Sector {index} of {} ends before it starts ({start} > {end})",
                    self.entry
                )));
            }
            (start, end - start)
        } else {
            (index * self.sector_size, expected)
        };

        let mut sector = self.slice(start, length)?.to_vec();

        if self.entry.is_encrypted() && self.entry.file_size > 3 {
            let seed = self.require_seed()?;
            decrypt_block(&mut sector, seed.wrapping_add(index as u32));
        }

        if self.entry.is_compressed() && sector.len() != expected {
            if !self.entry.is_multi_compressed() {
                return Err(Error::UnsupportedCodec(CompressionMethod::Implode));
            }
            sector = decompress_sector(&sector, expected)?;
        }

        Ok(sector)
    }

    /// Read up to `count` bytes starting at `offset`
    ///
    /// The result is cut short at the end of the file.
    pub fn read_at(&mut self, offset: usize, count: usize) -> Result<Vec<u8>> {
        let end = offset.saturating_add(count).min(self.len());
        let mut output = Vec::with_capacity(end.saturating_sub(offset));

        let sector_size = self.sector_size;
        let mut position = offset;
        while position < end {
            let sector = self.buffer_sector(position)?;
            let local = position % sector_size;
            let available = sector.len().saturating_sub(local).min(end - position);
            if available == 0 {
                break;
            }

            output.extend_from_slice(&sector[local..local + available]);
            position += available;
        }

        Ok(output)
    }

    /// Read the whole file
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        self.read_at(0, self.len())
    }

    /// Uncompressed size of the file
    pub fn len(&self) -> usize {
        self.entry.file_size as usize
    }

    /// Check if the file is empty
    pub fn is_empty(&self) -> bool {
        self.entry.file_size == 0
    }

    /// Size of one decoded sector
    pub fn sector_size(&self) -> usize {
        self.sector_size
    }

    /// Number of data sectors (the checksum sector is not counted)
    pub fn sector_count(&self) -> usize {
        if self.sector_size == 0 {
            return 0;
        }
        self.len().div_ceil(self.sector_size)
    }

    /// The block entry being read
    pub fn entry(&self) -> &'a BlockEntry {
        self.entry
    }

    fn buffer_sector(&mut self, offset: usize) -> Result<&[u8]> {
        let index = offset / self.sector_size;
        let cache_hit = matches!(&self.cached, Some((cached, _)) if *cached == index);

        if !cache_hit {
            let expected = (self.len() - index * self.sector_size).min(self.sector_size);
            let sector = self.load_sector(index, expected)?;
            log::trace!(
                "Loaded sector {index} of {}: {} bytes",
                self.entry,
                sector.len()
            );
            self.cached = Some((index, sector));
        }

        Ok(self
            .cached
            .as_ref()
            .map(|(_, sector)| sector.as_slice())
            .unwrap_or_default())
    }

    fn boundary(&self, index: usize) -> Result<usize> {
        self.boundaries
            .get(index)
            .map(|&value| value as usize)
            .ok_or_else(|| {
                Error::invalid_format(format!(
                    "Sector {index} of {} has no boundary entry",
                    self.entry
                ))
            })
    }

    /// View into the archive relative to the entry's data start
    fn slice(&self, start: usize, length: usize) -> Result<&'a [u8]> {
        let data = self.data;
        usize::try_from(self.entry.file_pos)
            .ok()
            .and_then(|base| base.checked_add(start))
            .and_then(|begin| Some(begin..begin.checked_add(length)?))
            .and_then(|range| data.get(range))
            .ok_or_else(|| {
                Error::invalid_format(format!(
                    "Data for {} at +0x{start:X} ({length} bytes) lies outside the archive",
                    self.entry
                ))
            })
    }

    fn require_seed(&self) -> Result<u32> {
        match self.entry.encryption_seed() {
            0 => Err(Error::UnknownEncryptionKey(self.entry.to_string())),
            seed => Ok(seed),
        }
    }
}

fn into_io_error(error: Error) -> io::Error {
    match error {
        Error::Io(e) => e,
        other => io::Error::new(io::ErrorKind::InvalidData, other),
    }
}

impl Read for SectorStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Ok(offset) = usize::try_from(self.position) else {
            return Ok(0);
        };

        let chunk = self.read_at(offset, buf.len()).map_err(into_io_error)?;
        buf[..chunk.len()].copy_from_slice(&chunk);
        self.position += chunk.len() as u64;
        Ok(chunk.len())
    }
}

impl Seek for SectorStream<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => (self.len() as u64).checked_add_signed(delta),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
        };

        self.position = target.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )
        })?;
        Ok(self.position)
    }
}
