use sqlpeek::{
    codec::{
        record::{assemble_row, decode_record, parse_record_header},
        varint,
    },
    storage::header::TextEncoding,
    types::{error::DatabaseError, record::RawRecord, value::Value},
    utils::mock::encode_record,
};

fn raw_record(cell: Vec<u8>) -> RawRecord {
    let (payload_length, payload_length_len) = varint::decode(&cell).unwrap();
    let (_, row_id_len) = varint::decode_at(&cell, payload_length_len).unwrap();
    RawRecord {
        cell_offset: 0,
        payload_length,
        payload_length_len,
        row_id_len,
        bytes: cell,
    }
}

#[test]
fn test_parse_header_of_hand_built_record() {
    // payload 7, row-id 1, header length 4, codes [0, 1, 17], body [42, 'h', 'i']
    let record = raw_record(vec![0x07, 0x01, 0x04, 0x00, 0x01, 0x11, 0x2A, b'h', b'i']);
    let header = parse_record_header(&record).unwrap();

    assert_eq!(header.row_id, 1);
    assert_eq!(header.header_length, 4);
    assert_eq!(header.column_codes, vec![0, 1, 17]);
    assert_eq!(header.body_start, 6);
}

#[test]
fn test_decode_record_preserves_header_order() {
    let record = raw_record(vec![0x07, 0x01, 0x04, 0x00, 0x01, 0x11, 0x2A, b'h', b'i']);
    let row = decode_record(&record, TextEncoding::Utf8).unwrap();

    assert_eq!(row.row_id, 1);
    assert_eq!(
        row.columns,
        vec![Value::Null, Value::Int8(42), Value::Text("hi".to_string())]
    );
}

#[test]
fn test_multi_byte_row_id_and_size_code() {
    let text = "x".repeat(100); // serial code 213, two varint bytes
    let columns = vec![Value::Text(text.clone()), Value::Int16(-2)];
    let record = raw_record(encode_record(300, &columns));

    let header = parse_record_header(&record).unwrap();
    assert_eq!(record.row_id_len, 2);
    assert_eq!(header.row_id, 300);
    assert_eq!(header.column_codes, vec![213, 2]);

    let row = assemble_row(&record, &header, TextEncoding::Utf8).unwrap();
    assert_eq!(row.columns, columns);
}

#[test]
fn test_every_storage_class_round_trips_through_a_record() {
    let columns = vec![
        Value::Null,
        Value::Int8(-1),
        Value::Int16(1000),
        Value::Int24(-70_000),
        Value::Int32(i32::MIN),
        Value::Int48(-140_737_488_355_328),
        Value::Int64(i64::MAX),
        Value::Real(-0.5),
        Value::Flag(false),
        Value::Flag(true),
        Value::Blob(vec![1, 2, 3]),
        Value::Text(String::new()),
    ];
    let record = raw_record(encode_record(9, &columns));
    let row = decode_record(&record, TextEncoding::Utf8).unwrap();
    assert_eq!(row.columns, columns);
}

#[test]
fn test_header_length_past_record_is_malformed() {
    // header claims 9 bytes but the record ends after 3
    let record = raw_record(vec![0x03, 0x01, 0x09, 0x01, 0x05]);
    assert!(matches!(
        parse_record_header(&record),
        Err(DatabaseError::MalformedHeader { .. })
    ));
}

#[test]
fn test_size_code_overrunning_header_is_malformed() {
    // header length 2 leaves room for one byte, which has its continuation bit set
    let record = raw_record(vec![0x04, 0x01, 0x02, 0x81, 0x01, 0x00]);
    assert!(matches!(
        parse_record_header(&record),
        Err(DatabaseError::MalformedHeader { .. })
    ));
}

#[test]
fn test_body_shorter_than_header_claims() {
    // code 6 needs 8 body bytes, only 2 present
    let record = raw_record(vec![0x04, 0x01, 0x02, 0x06, 0x00, 0x01]);
    assert!(matches!(
        decode_record(&record, TextEncoding::Utf8),
        Err(DatabaseError::MalformedRecord { .. })
    ));
}

#[test]
fn test_reserved_code_in_header() {
    let record = raw_record(vec![0x02, 0x01, 0x02, 0x0A]);
    assert!(matches!(
        decode_record(&record, TextEncoding::Utf8),
        Err(DatabaseError::ReservedSerialType(10))
    ));
}

#[test]
fn test_column_wider_than_any_record_is_rejected() {
    // Single code u64::MAX: a text column far larger than the 12-byte cell.
    let mut cell = vec![0x0A, 0x01, 0x0A];
    cell.extend_from_slice(&[0xFF; 9]);
    let record = raw_record(cell);

    let result = decode_record(&record, TextEncoding::Utf8);
    assert!(matches!(
        result,
        Err(DatabaseError::MalformedRecord { .. }) | Err(DatabaseError::MalformedHeader { .. })
    ));
}
