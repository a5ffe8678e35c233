//! Bit-oriented reader over an in-memory buffer

use crate::{Error, Result};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use encoding_rs::Encoding;

/// Bit packing and multi-byte integer order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Endian {
    /// Most significant chunk first
    #[default]
    Big,
    /// Least significant chunk first
    Little,
}

/// Sequential bit/byte reader
///
/// Bits are always consumed from the low end of the current byte. The
/// configured [`Endian`] decides where each consumed chunk lands in the
/// result of [`read_bits`](Self::read_bits): big-endian fills from the top
/// down, little-endian from the bottom up.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
    next: u32,
    next_bits: u32,
    endian: Endian,
}

impl<'a> BitReader<'a> {
    /// Create a big-endian reader at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_endian(data, Endian::Big)
    }

    /// Create a reader with the given endianness
    pub fn with_endian(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            position: 0,
            next: 0,
            next_bits: 0,
            endian,
        }
    }

    /// Byte position of the next whole byte to be loaded
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move to an absolute byte offset, dropping any partial byte
    pub fn seek_byte(&mut self, offset: usize) {
        self.align_to_byte();
        self.position = offset;
    }

    /// Discard the remaining bits of a partially consumed byte
    pub fn align_to_byte(&mut self) {
        self.next_bits = 0;
    }

    /// True when byte-aligned and at or past the end of the buffer
    pub fn is_exhausted(&self) -> bool {
        self.next_bits == 0 && self.position >= self.data.len()
    }

    /// Read `bits` bits (at most 32) as an unsigned value
    pub fn read_bits(&mut self, bits: u32) -> Result<u32> {
        if bits > 32 {
            return Err(Error::invalid_format(format!(
                "Cannot read {bits} bits into a 32-bit value"
            )));
        }

        let mut result = 0u32;
        let mut consumed = 0u32;
        while consumed != bits {
            if self.next_bits == 0 {
                let byte = *self.data.get(self.position).ok_or(Error::TruncatedRead {
                    position: self.position,
                    needed: (bits - consumed).div_ceil(8) as usize,
                })?;
                self.position += 1;
                self.next = byte as u32;
                self.next_bits = 8;
            }

            let copy_bits = (bits - consumed).min(self.next_bits);
            let copy = self.next & ((1 << copy_bits) - 1);
            result |= match self.endian {
                Endian::Big => copy << (bits - consumed - copy_bits),
                Endian::Little => copy << consumed,
            };

            self.next >>= copy_bits;
            self.next_bits -= copy_bits;
            consumed += copy_bits;
        }

        Ok(result)
    }

    /// Read `count` bytes bit by bit, without aligning first
    pub fn read_unaligned_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        (0..count).map(|_| Ok(self.read_bits(8)? as u8)).collect()
    }

    /// Align, then read a 1 to 4 byte unsigned integer
    pub fn read_aligned_bytes(&mut self, count: usize) -> Result<u32> {
        if !(1..=4).contains(&count) {
            return Err(Error::invalid_format(format!(
                "Aligned integer width must be 1-4 bytes, got {count}"
            )));
        }

        let bytes = self.take(count)?;
        let value = match self.endian {
            Endian::Big => BigEndian::read_uint(bytes, count),
            Endian::Little => LittleEndian::read_uint(bytes, count),
        };
        Ok(value as u32)
    }

    /// Align, then borrow the next `count` bytes
    pub fn read_blob(&mut self, count: usize) -> Result<&'a [u8]> {
        self.take(count)
    }

    /// Align, then read a zero-terminated string
    pub fn read_string(&mut self, encoding: &'static Encoding) -> Result<String> {
        self.align_to_byte();
        let rest = self.data.get(self.position..).unwrap_or_default();
        let end = memchr::memchr(0, rest).ok_or(Error::TruncatedRead {
            position: self.data.len(),
            needed: 1,
        })?;

        let (text, _) = encoding.decode_without_bom_handling(&rest[..end]);
        self.position += end + 1;
        Ok(text.into_owned())
    }

    /// Align, then advance to the next occurrence of `needle`
    ///
    /// Returns the new byte position. The cursor is left unchanged when the
    /// rest of the buffer does not contain `needle`.
    pub fn seek_string(&mut self, needle: &[u8]) -> Result<usize> {
        self.align_to_byte();
        let rest = self.data.get(self.position..).unwrap_or_default();
        let found = memchr::memmem::find(rest, needle).ok_or(Error::SeekFailed)?;
        self.position += found;
        Ok(self.position)
    }

    /// Read a signed variable-length integer
    ///
    /// Seven payload bits per byte with the high bit as continuation; the low
    /// bit of the assembled value is the sign.
    pub fn read_variable_int(&mut self) -> Result<i64> {
        let mut value = 0u64;
        for shift in (0..70).step_by(7) {
            let byte = self.read_bits(8)?;
            value |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                let magnitude = (value >> 1) as i64;
                return Ok(if value & 1 != 0 { -magnitude } else { magnitude });
            }
        }

        Err(Error::invalid_format(
            "Variable-length integer longer than 10 bytes",
        ))
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        self.align_to_byte();
        let end = self.position.saturating_add(count);
        let bytes = self
            .data
            .get(self.position..end)
            .ok_or(Error::TruncatedRead {
                position: self.position,
                needed: end - self.data.len().max(self.position),
            })?;
        self.position = end;
        Ok(bytes)
    }
}
