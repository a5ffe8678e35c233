//! Encryption operations for MPQ data

use super::keys::{CIPHER_RANGE, ENCRYPTION_TABLE};

/// Encrypt a block of data in place
///
/// Inverse of [`decrypt_block`](super::decrypt_block), with the same rule
/// for a trailing partial word.
pub fn encrypt_block(data: &mut [u8], mut key: u32) {
    let mut seed: u32 = 0xEEEEEEEE;

    for word in data.chunks_exact_mut(4) {
        seed = seed.wrapping_add(ENCRYPTION_TABLE[CIPHER_RANGE + (key & 0xFF) as usize]);

        let plain = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
        word.copy_from_slice(&(plain ^ key.wrapping_add(seed)).to_le_bytes());

        key = (!key << 0x15).wrapping_add(0x11111111) | (key >> 0x0B);
        seed = plain
            .wrapping_add(seed)
            .wrapping_add(seed << 5)
            .wrapping_add(3);
    }
}
