//! Storm key table

/// Number of entries in the key table
const TABLE_SIZE: usize = 0x500;

/// First entry of the range driving the block cipher
pub(super) const CIPHER_RANGE: usize = 0x400;

/// The shared key table, in five interleaved ranges of 0x100 entries
pub const ENCRYPTION_TABLE: [u32; TABLE_SIZE] = build_table();

const fn build_table() -> [u32; TABLE_SIZE] {
    let mut table = [0u32; TABLE_SIZE];
    let mut seed: u32 = 0x0010_0001;

    let mut column = 0;
    while column < 0x100 {
        let mut index = column;
        let mut round = 0;
        while round < 5 {
            seed = (seed * 125 + 3) % 0x002A_AAAB;
            let high = (seed & 0xFFFF) << 16;
            seed = (seed * 125 + 3) % 0x002A_AAAB;
            let low = seed & 0xFFFF;

            table[index] = high | low;

            round += 1;
            index += 0x100;
        }
        column += 1;
    }

    table
}
