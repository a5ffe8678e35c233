//! MPQ string hashing and file key derivation

use super::keys::ENCRYPTION_TABLE;
use super::types::hash_type;

/// Hash a string using the MPQ hash algorithm
///
/// Characters are uppercased (ASCII only) before hashing, so the result is
/// case-insensitive. `hash_type` is one of the [`hash_type`] ranges; other
/// values wrap around the key table.
pub fn hash_string(input: &str, hash_type: u32) -> u32 {
    let mut seed1: u32 = 0x7FED7FED;
    let mut seed2: u32 = 0xEEEEEEEE;

    for &byte in input.as_bytes() {
        let ch = byte.to_ascii_uppercase() as u32;

        let index = hash_type.wrapping_add(ch) as usize % ENCRYPTION_TABLE.len();
        seed1 = ENCRYPTION_TABLE[index] ^ seed1.wrapping_add(seed2);
        seed2 = ch
            .wrapping_add(seed1)
            .wrapping_add(seed2)
            .wrapping_add(seed2 << 5)
            .wrapping_add(3);
    }

    seed1
}

/// Derive the encryption seed of a member file
///
/// Only the basename (after the last `\` or `/`) takes part in the hash.
/// With `adjusted` set (the `FIX_KEY` block flag) the seed is further mixed
/// with the entry's offset and uncompressed size.
pub fn file_key(filename: &str, file_offset: u32, file_size: u32, adjusted: bool) -> u32 {
    let basename = filename
        .rsplit(['\\', '/'])
        .next()
        .unwrap_or(filename);

    let seed = hash_string(basename, hash_type::FILE_KEY);
    if adjusted {
        seed.wrapping_add(file_offset) ^ file_size
    } else {
        seed
    }
}
