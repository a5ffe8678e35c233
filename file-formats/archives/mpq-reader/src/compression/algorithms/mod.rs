//! Compression algorithm implementations

pub(super) mod bzip2;
