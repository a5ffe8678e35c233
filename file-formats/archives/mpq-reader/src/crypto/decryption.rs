//! Decryption operations for MPQ data

use super::hash::hash_string;
use super::keys::{CIPHER_RANGE, ENCRYPTION_TABLE};
use super::types::hash_type;

/// Decrypt a block of data in place
///
/// The buffer is processed as little-endian `u32` words. A trailing partial
/// word (1 to 3 bytes) is left as stored.
pub fn decrypt_block(data: &mut [u8], mut key: u32) {
    let mut seed: u32 = 0xEEEEEEEE;

    for word in data.chunks_exact_mut(4) {
        seed = seed.wrapping_add(ENCRYPTION_TABLE[CIPHER_RANGE + (key & 0xFF) as usize]);

        let value = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
        let plain = value ^ key.wrapping_add(seed);
        word.copy_from_slice(&plain.to_le_bytes());

        key = (!key << 0x15).wrapping_add(0x11111111) | (key >> 0x0B);
        seed = plain
            .wrapping_add(seed)
            .wrapping_add(seed << 5)
            .wrapping_add(3);
    }
}

/// Decrypt a metadata table keyed by its well-known name
///
/// ```
/// use mpq_reader::crypto::{decrypt_table, encrypt_block, hash_string, hash_type};
///
/// let mut table = vec![0xFFu8; 16];
/// encrypt_block(&mut table, hash_string("(hash table)", hash_type::FILE_KEY));
/// decrypt_table(&mut table, "(hash table)");
/// assert_eq!(table, vec![0xFFu8; 16]);
/// ```
pub fn decrypt_table(data: &mut [u8], key_name: &str) {
    decrypt_block(data, hash_string(key_name, hash_type::FILE_KEY));
}
