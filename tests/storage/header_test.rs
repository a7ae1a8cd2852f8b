use sqlpeek::{
    storage::header::{DatabaseHeader, TextEncoding, page_size_from_bytes},
    types::{HEADER_SIZE, error::DatabaseError},
};

#[test]
fn test_header_round_trip() {
    let mut header = DatabaseHeader::new(4096);
    header.database_size_pages = 3;
    header.text_encoding = TextEncoding::Utf16le;
    header.user_version = 7;

    let bytes = header.to_bytes();
    assert_eq!(bytes.len(), HEADER_SIZE);
    assert_eq!(&bytes[16..18], &[0x10, 0x00]);

    let parsed = DatabaseHeader::from_bytes(&bytes, true).unwrap();
    assert_eq!(parsed, header);
}

#[test]
fn test_page_size_one_means_65536() {
    let header = DatabaseHeader::new(65536);
    let bytes = header.to_bytes();
    assert_eq!(&bytes[16..18], &[0x00, 0x01]);
    assert_eq!(page_size_from_bytes(&bytes).unwrap(), 65536);
}

#[test]
fn test_rejects_bad_page_size() {
    let mut bytes = DatabaseHeader::new(4096).to_bytes();
    bytes[16] = 0x03;
    bytes[17] = 0x00; // 768, not a power of two
    assert!(matches!(
        DatabaseHeader::from_bytes(&bytes, true),
        Err(DatabaseError::InvalidHeader { .. })
    ));
}

#[test]
fn test_rejects_bad_magic_unless_disabled() {
    let mut bytes = DatabaseHeader::new(1024).to_bytes();
    bytes[0] = b'X';
    assert!(matches!(
        DatabaseHeader::from_bytes(&bytes, true),
        Err(DatabaseError::InvalidHeader { .. })
    ));
    assert_eq!(DatabaseHeader::from_bytes(&bytes, false).unwrap().page_size, 1024);
}

#[test]
fn test_rejects_short_header() {
    assert!(matches!(
        DatabaseHeader::from_bytes(&[0u8; 40], true),
        Err(DatabaseError::InvalidHeader { .. })
    ));
}

#[test]
fn test_usable_page_size_subtracts_reserved_space() {
    let mut header = DatabaseHeader::new(4096);
    header.reserved_space = 32;
    assert_eq!(header.usable_page_size(), 4064);
}
