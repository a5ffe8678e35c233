//! Sector streaming over stored files

use crate::common::{ArchiveBuilder, Storage, generate_test_data};
use mpq_reader::Archive;
use pretty_assertions::assert_eq;
use std::io::{Read, Seek, SeekFrom};

fn archive_with(data: &[u8]) -> Archive {
    let buffer = ArchiveBuilder::new()
        .prefix(vec![0x11; 100])
        .file("data.bin", data, Storage::Stored)
        .build();
    Archive::load(buffer).unwrap()
}

#[test]
fn test_stored_read_all_matches_buffer() {
    let data = generate_test_data(2000);
    let archive = archive_with(&data);

    let mut stream = archive.open("data.bin").unwrap();
    let entry = stream.entry();
    let start = entry.file_pos as usize;
    let expected = archive.data()[start..start + entry.file_size as usize].to_vec();

    assert_eq!(stream.len(), 2000);
    assert_eq!(stream.sector_size(), 512);
    assert_eq!(stream.sector_count(), 4);
    assert_eq!(stream.read_all().unwrap(), expected);
    assert_eq!(expected, data);
}

#[test]
fn test_read_at_offsets() {
    let data = generate_test_data(1500);
    let archive = archive_with(&data);
    let mut stream = archive.open("data.bin").unwrap();

    // Within one sector
    assert_eq!(stream.read_at(10, 20).unwrap(), data[10..30].to_vec());
    // Across two sector boundaries
    assert_eq!(stream.read_at(500, 600).unwrap(), data[500..1100].to_vec());
    // Backwards into an earlier sector
    assert_eq!(stream.read_at(0, 4).unwrap(), data[0..4].to_vec());
    // Past the end
    assert_eq!(stream.read_at(1400, 500).unwrap(), data[1400..].to_vec());
    assert!(stream.read_at(1500, 1).unwrap().is_empty());
    assert!(stream.read_at(usize::MAX, 1).unwrap().is_empty());
}

#[test]
fn test_empty_file() {
    let archive = archive_with(b"");
    let mut stream = archive.open("data.bin").unwrap();

    assert!(stream.is_empty());
    assert!(stream.read_all().unwrap().is_empty());
}

#[test]
fn test_io_read_agrees_with_read_at() {
    let data = generate_test_data(1234);
    let archive = archive_with(&data);

    let mut stream = archive.open("data.bin").unwrap();
    let mut via_read = Vec::new();
    stream.read_to_end(&mut via_read).unwrap();
    assert_eq!(via_read, stream.read_at(0, 1234).unwrap());

    let mut chunk = [0u8; 100];
    stream.seek(SeekFrom::Start(700)).unwrap();
    stream.read_exact(&mut chunk).unwrap();
    assert_eq!(chunk.to_vec(), stream.read_at(700, 100).unwrap());

    assert_eq!(stream.stream_position().unwrap(), 800);
    stream.seek(SeekFrom::Current(-300)).unwrap();
    stream.read_exact(&mut chunk).unwrap();
    assert_eq!(chunk.to_vec(), data[500..600].to_vec());

    // Reading at the end yields nothing
    stream.seek(SeekFrom::End(0)).unwrap();
    assert_eq!(stream.read(&mut chunk).unwrap(), 0);
}

#[test]
fn test_io_copy() {
    let data = generate_test_data(3000);
    let archive = archive_with(&data);

    let mut stream = archive.open("data.bin").unwrap();
    let mut sink = Vec::new();
    let copied = std::io::copy(&mut stream, &mut sink).unwrap();

    assert_eq!(copied, 3000);
    assert_eq!(sink, data);
}

#[test]
fn test_larger_sectors() {
    let data = generate_test_data(10_000);
    let buffer = ArchiveBuilder::new()
        .sector_shift(3)
        .file("data.bin", &data, Storage::Stored)
        .build();
    let archive = Archive::load(buffer).unwrap();

    let mut stream = archive.open("data.bin").unwrap();
    assert_eq!(stream.sector_size(), 4096);
    assert_eq!(stream.sector_count(), 3);
    assert_eq!(stream.read_all().unwrap(), data);
}
