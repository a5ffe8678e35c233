//! Parsing binary member files with the bit reader

use mpq_reader::{BitReader, Endian, Error, MpqHeader};
use proptest::prelude::*;

#[test]
fn test_parse_info_record() {
    // A little-endian record: u32 version, string, u16 flags, 3-byte blob
    let mut record = Vec::new();
    record.extend_from_slice(&25u32.to_le_bytes());
    record.extend_from_slice(b"Skirmish Map\0");
    record.extend_from_slice(&0x0810u16.to_le_bytes());
    record.extend_from_slice(&[0xDE, 0xAD, 0xBF]);

    let mut reader = BitReader::with_endian(&record, Endian::Little);
    assert_eq!(reader.read_aligned_bytes(4).unwrap(), 25);
    assert_eq!(
        reader.read_string(encoding_rs::UTF_8).unwrap(),
        "Skirmish Map"
    );
    assert_eq!(reader.read_aligned_bytes(2).unwrap(), 0x0810);
    assert_eq!(reader.read_blob(3).unwrap(), &[0xDE, 0xAD, 0xBF]);
    assert!(reader.is_exhausted());
}

#[test]
fn test_seek_to_embedded_header() {
    let mut data = b"PE executable stub".to_vec();
    let header_at = data.len();
    data.extend_from_slice(b"MPQ\x1A");
    data.extend_from_slice(&0x20u32.to_le_bytes());
    data.extend_from_slice(&[0u8; 40]);

    let mut reader = BitReader::new(&data);
    let found = reader.seek_string(b"MPQ\x1A").unwrap();
    assert_eq!(found, header_at);

    let header = MpqHeader::parse(&data, found).unwrap();
    assert_eq!(header.data_offset, 0x20);

    reader.seek_byte(found + 1);
    assert!(matches!(
        reader.seek_string(b"MPQ\x1A"),
        Err(Error::SeekFailed)
    ));
}

#[test]
fn test_mixed_bit_fields() {
    // 3-bit, 5-bit, then a 12-bit field across two bytes
    let data = [0b1010_1101, 0b0011_0110, 0b0000_1111];
    let mut reader = BitReader::with_endian(&data, Endian::Little);

    assert_eq!(reader.read_bits(3).unwrap(), 0b101);
    assert_eq!(reader.read_bits(5).unwrap(), 0b10101);
    assert_eq!(reader.read_bits(12).unwrap(), 0b1111_0011_0110);
    reader.align_to_byte();
    assert!(reader.is_exhausted());
}

proptest! {
    #[test]
    fn prop_byte_reads_match_buffer(data in prop::collection::vec(any::<u8>(), 0..64)) {
        for endian in [Endian::Big, Endian::Little] {
            let mut reader = BitReader::with_endian(&data, endian);
            let bytes = reader.read_unaligned_bytes(data.len()).unwrap();
            prop_assert_eq!(&bytes, &data);
            prop_assert!(reader.is_exhausted());
        }
    }
}
