//! Common helpers for the 16-byte record tables

use crate::crypto::decrypt_table;
use crate::{Error, Result};

/// Size of one hash or block table record
pub const ENTRY_SIZE: usize = 16;

/// Copy a table span out of the archive buffer and decrypt it
///
/// The span is `[pos, pos + count * ENTRY_SIZE)`. The archive buffer itself
/// is never modified.
pub(crate) fn read_table(
    data: &[u8],
    table: &'static str,
    key_name: &str,
    pos: u64,
    count: u32,
) -> Result<Vec<u8>> {
    let needed = u64::from(count) * ENTRY_SIZE as u64;
    let available = (data.len() as u64).saturating_sub(pos);

    let span = pos
        .checked_add(needed)
        .filter(|&end| end <= data.len() as u64)
        .map(|end| &data[pos as usize..end as usize])
        .ok_or(Error::TruncatedTable {
            table,
            needed,
            available,
        })?;

    let mut raw = span.to_vec();
    decrypt_table(&mut raw, key_name);

    log::debug!("Loaded {table}: {count} entries at 0x{pos:X}");
    Ok(raw)
}
