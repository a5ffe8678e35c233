//! Archive loading and name resolution

use crate::common::{ArchiveBuilder, Storage, generate_test_data, init_logging};
use mpq_reader::{Archive, Error, OpenOptions, hash_string, hash_type};
use pretty_assertions::assert_eq;

#[test]
fn test_load_basic_archive() {
    init_logging();
    let data = generate_test_data(1000);
    let buffer = ArchiveBuilder::new()
        .file("war3map.j", &data, Storage::Stored)
        .file("war3map.w3e", b"W3E!", Storage::Stored)
        .build();

    let archive = Archive::load(buffer).unwrap();
    let header = archive.header();
    assert_eq!(header.header_offset, 0);
    assert_eq!(header.format_version, 0);
    assert_eq!(header.sector_size(), 512);
    assert_eq!(archive.hash_table().len(), 16);
    assert_eq!(archive.block_table().len(), 2);

    assert_eq!(archive.read_file("war3map.j").unwrap(), data);
    assert_eq!(archive.read_file("WAR3MAP.W3E").unwrap(), b"W3E!".to_vec());
}

#[test]
fn test_header_after_leading_junk() {
    let junk = vec![0xABu8; 0x3000];
    let buffer = ArchiveBuilder::new()
        .prefix(junk)
        .file("war3map.j", b"function main takes nothing returns nothing", Storage::Stored)
        .build();

    let archive = Archive::load(buffer).unwrap();
    let header = archive.header();
    assert_eq!(header.header_offset, 0x3000);
    assert!(header.hash_table_pos > 0x3000);

    let entry = &archive.block_table().entries()[0];
    assert_eq!(entry.file_pos, entry.file_offset as u64 + 0x3000);
    assert_eq!(
        archive.read_file("war3map.j").unwrap(),
        b"function main takes nothing returns nothing".to_vec()
    );
}

#[test]
fn test_protected_archive() {
    let buffer = ArchiveBuilder::new()
        .prefix(vec![0u8; 0x200])
        .protected()
        .file("war3map.j", b"protected script", Storage::Stored)
        .build();

    let archive = Archive::load(buffer).unwrap();
    assert_eq!(archive.header().data_offset, 0x220);
    assert_eq!(
        archive.read_file("war3map.j").unwrap(),
        b"protected script".to_vec()
    );
}

#[test]
fn test_version_one_rejected() {
    let buffer = ArchiveBuilder::new()
        .version(1)
        .file("war3map.j", b"data", Storage::Stored)
        .build();

    let err = Archive::load(buffer).unwrap_err();
    assert!(matches!(err, Error::UnsupportedVersion(1)));
    assert!(err.is_load_failure());
}

#[test]
fn test_later_version_loads() {
    let buffer = ArchiveBuilder::new()
        .version(2)
        .file("war3map.j", b"script", Storage::Stored)
        .build();

    let archive = Archive::load(buffer).unwrap();
    assert_eq!(archive.header().format_version, 2);
    assert_eq!(archive.read_file("war3map.j").unwrap(), b"script".to_vec());
}

#[test]
fn test_no_header() {
    let err = Archive::load(generate_test_data(4096)).unwrap_err();
    assert!(matches!(err, Error::HeaderNotFound));
}

#[test]
fn test_truncated_tables() {
    let mut buffer = ArchiveBuilder::new()
        .file("war3map.j", &generate_test_data(256), Storage::Stored)
        .build();
    // Cut into the block table
    buffer.truncate(buffer.len() - 8);

    let err = Archive::load(buffer).unwrap_err();
    assert!(matches!(
        err,
        Error::TruncatedTable {
            table: "block table",
            ..
        }
    ));
}

#[test]
fn test_hash_table_with_odd_size() {
    let buffer = ArchiveBuilder::new()
        .hash_table_size(12)
        .file("war3map.j", b"data", Storage::Stored)
        .file("war3map.w3i", b"info", Storage::Stored)
        .build();

    let archive = Archive::load(buffer).unwrap();
    assert_eq!(archive.hash_table().len(), 12);
    assert_eq!(archive.read_file("war3map.j").unwrap(), b"data".to_vec());
    assert_eq!(archive.read_file("war3map.w3i").unwrap(), b"info".to_vec());
}

#[test]
fn test_empty_hash_table() {
    let mut buffer = ArchiveBuilder::new().hash_table_size(0).build();
    // Both tables are empty, so pad past the header to keep it in scan range
    buffer.extend_from_slice(&[0u8; 16]);

    let archive = Archive::load(buffer).unwrap();
    let err = archive.open("war3map.j").unwrap_err();
    assert!(matches!(err, Error::FileNotFound(ref name) if name == "war3map.j"));
}

#[test]
fn test_missing_file() {
    let buffer = ArchiveBuilder::new()
        .file("war3map.j", b"data", Storage::Stored)
        .build();
    let archive = Archive::load(buffer).unwrap();

    let err = archive.open("war3map.w3u").unwrap_err();
    assert!(matches!(err, Error::FileNotFound(_)));
    assert!(err.is_recoverable());

    // The archive is still usable afterwards
    assert_eq!(archive.read_file("war3map.j").unwrap(), b"data".to_vec());
}

#[test]
fn test_resolve_matches_slot() {
    let buffer = ArchiveBuilder::new()
        .file("Units\\Human\\Footman.mdx", b"MDLX", Storage::Stored)
        .build();
    let archive = Archive::load(buffer).unwrap();

    let entry = archive.resolve("units\\human\\footman.mdx").unwrap();
    assert_eq!(
        entry.name_1,
        hash_string("Units\\Human\\Footman.mdx", hash_type::NAME_A)
    );
    assert_eq!(entry.block_index, 0);
}

#[test]
fn test_colliding_start_slots_probe_forward() {
    // With a two-slot table both names land on slots 0 and 1 in insertion
    // order; whichever slot the second name starts on, the probe finds it.
    let buffer = ArchiveBuilder::new()
        .hash_table_size(2)
        .file("war3map.j", b"script", Storage::Stored)
        .file("war3map.w3i", b"info", Storage::Stored)
        .build();
    let archive = Archive::load(buffer).unwrap();

    assert_eq!(archive.read_file("war3map.j").unwrap(), b"script".to_vec());
    assert_eq!(archive.read_file("war3map.w3i").unwrap(), b"info".to_vec());
}

#[test]
fn test_add_filename_first_wins() {
    let buffer = ArchiveBuilder::new()
        .file("war3map.j", b"data", Storage::Stored)
        .build();
    let archive = Archive::load(buffer).unwrap();

    assert!(archive.list().is_empty());
    assert!(archive.add_filename("war3map.j").unwrap());
    assert!(!archive.add_filename("WAR3MAP.J").unwrap());
    assert_eq!(archive.list(), vec!["war3map.j"]);

    assert!(matches!(
        archive.add_filename("missing.txt"),
        Err(Error::FileNotFound(_))
    ));
}

#[test]
fn test_add_filenames_counts_resolved() {
    let buffer = ArchiveBuilder::new()
        .file("a.txt", b"a", Storage::Stored)
        .file("b.txt", b"b", Storage::Stored)
        .build();
    let archive = Archive::load(buffer).unwrap();

    let count = archive.add_filenames(["a.txt", "missing.txt", "b.txt"]);
    assert_eq!(count, 2);
    assert_eq!(archive.list(), vec!["a.txt", "b.txt"]);
}

#[test]
fn test_open_from_path() {
    let buffer = ArchiveBuilder::new()
        .file("war3map.j", b"on disk", Storage::Stored)
        .listfile()
        .build();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.w3x");
    std::fs::write(&path, &buffer).unwrap();

    let archive = OpenOptions::new().open(&path).unwrap();
    assert_eq!(archive.data(), &buffer[..]);
    assert!(archive.list().contains(&"war3map.j"));
}
