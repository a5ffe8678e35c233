//! Cryptographic types and constants

/// Key table ranges used by [`hash_string`](super::hash_string)
///
/// Each value is added to the character code before indexing the table.
pub mod hash_type {
    /// Hash for table offset calculation
    pub const TABLE_OFFSET: u32 = 0x000;
    /// First part of filename hash
    pub const NAME_A: u32 = 0x100;
    /// Second part of filename hash
    pub const NAME_B: u32 = 0x200;
    /// File and table encryption key generation
    pub const FILE_KEY: u32 = 0x300;
}
