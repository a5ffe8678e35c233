//! Low-level readers for binary data embedded in MPQ archives

mod bit_reader;

pub use bit_reader::{BitReader, Endian};
