//! MPQ table structures (hash, block)

mod block;
mod common;
mod hash;

pub use block::{BlockEntry, BlockFlags, BlockTable};
pub use common::ENTRY_SIZE;
pub use hash::{HashEntry, HashTable};
