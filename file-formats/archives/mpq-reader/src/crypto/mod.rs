//! Storm cipher: the MPQ hash and block encryption algorithms
//!
//! All operations share one 0x500-entry key table, generated at compile
//! time. The table is split into five 0x100-entry ranges: four are used by
//! [`hash_string`] (selected through [`hash_type`]) and the last one drives
//! the block cipher.
//!
//! ```
//! use mpq_reader::crypto::{hash_string, hash_type};
//!
//! let index = hash_string("(listfile)", hash_type::TABLE_OFFSET);
//! let name_a = hash_string("(listfile)", hash_type::NAME_A);
//! let name_b = hash_string("(listfile)", hash_type::NAME_B);
//! assert_eq!(index, 0x5F3DE859);
//! assert_ne!(name_a, name_b);
//! ```

mod decryption;
mod encryption;
mod hash;
mod keys;
mod types;

pub use decryption::{decrypt_block, decrypt_table};
pub use encryption::encrypt_block;
pub use hash::{file_key, hash_string};
pub use keys::ENCRYPTION_TABLE;
pub use types::hash_type;
