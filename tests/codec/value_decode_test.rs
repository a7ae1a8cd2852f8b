use sqlpeek::{
    codec::value::{decode_value, decode_value_with_encoding},
    storage::header::TextEncoding,
    types::{error::DatabaseError, serial_type::SerialType, value::Value},
};

#[test]
fn test_int16_is_signed() {
    assert_eq!(
        decode_value(SerialType::Int16, &[0xFF, 0xFF]).unwrap(),
        Value::Int16(-1)
    );
}

#[test]
fn test_int8_and_int32() {
    assert_eq!(decode_value(SerialType::Int8, &[0x2A]).unwrap(), Value::Int8(42));
    assert_eq!(decode_value(SerialType::Int8, &[0x80]).unwrap(), Value::Int8(-128));
    assert_eq!(
        decode_value(SerialType::Int32, &[0x00, 0x01, 0x00, 0x00]).unwrap(),
        Value::Int32(65_536)
    );
}

#[test]
fn test_int24_is_sign_extended() {
    assert_eq!(
        decode_value(SerialType::Int24, &[0xFF, 0xFF, 0xFE]).unwrap(),
        Value::Int24(-2)
    );
    assert_eq!(
        decode_value(SerialType::Int24, &[0x80, 0x00, 0x00]).unwrap(),
        Value::Int24(-8_388_608)
    );
    assert_eq!(
        decode_value(SerialType::Int24, &[0x7F, 0xFF, 0xFF]).unwrap(),
        Value::Int24(8_388_607)
    );
}

#[test]
fn test_int48_is_sign_extended() {
    assert_eq!(
        decode_value(SerialType::Int48, &[0xFF; 6]).unwrap(),
        Value::Int48(-1)
    );
    assert_eq!(
        decode_value(SerialType::Int48, &[0x00, 0x00, 0x00, 0x01, 0x00, 0x00]).unwrap(),
        Value::Int48(65_536)
    );
}

#[test]
fn test_int64_extremes() {
    assert_eq!(
        decode_value(SerialType::Int64, &i64::MIN.to_be_bytes()).unwrap(),
        Value::Int64(i64::MIN)
    );
    assert_eq!(
        decode_value(SerialType::Int64, &i64::MAX.to_be_bytes()).unwrap(),
        Value::Int64(i64::MAX)
    );
}

#[test]
fn test_float64_is_exact() {
    let bytes = 3.14f64.to_be_bytes();
    assert_eq!(
        decode_value(SerialType::Float64, &bytes).unwrap(),
        Value::Real(3.14)
    );
}

#[test]
fn test_flags_and_null_consume_nothing() {
    assert_eq!(decode_value(SerialType::Zero, &[]).unwrap(), Value::Flag(false));
    assert_eq!(decode_value(SerialType::One, &[]).unwrap(), Value::Flag(true));
    assert_eq!(decode_value(SerialType::Null, &[]).unwrap(), Value::Null);
}

#[test]
fn test_text_and_blob_pass_through() {
    assert_eq!(
        decode_value(SerialType::Text(2), b"hi").unwrap(),
        Value::Text("hi".to_string())
    );
    assert_eq!(
        decode_value(SerialType::Blob(3), &[0x00, 0xFF, 0x10]).unwrap(),
        Value::Blob(vec![0x00, 0xFF, 0x10])
    );
}

#[test]
fn test_invalid_utf8_is_replaced() {
    assert_eq!(
        decode_value(SerialType::Text(2), &[b'a', 0xFF]).unwrap(),
        Value::Text("a\u{FFFD}".to_string())
    );
}

#[test]
fn test_utf16_text() {
    assert_eq!(
        decode_value_with_encoding(SerialType::Text(4), &[b'h', 0, b'i', 0], TextEncoding::Utf16le)
            .unwrap(),
        Value::Text("hi".to_string())
    );
    assert_eq!(
        decode_value_with_encoding(SerialType::Text(4), &[0, b'h', 0, b'i'], TextEncoding::Utf16be)
            .unwrap(),
        Value::Text("hi".to_string())
    );
}

#[test]
fn test_width_mismatch_is_rejected() {
    match decode_value(SerialType::Int32, &[0x01, 0x02]) {
        Err(DatabaseError::ValueWidthMismatch { expected, actual }) => {
            assert_eq!(expected, 4);
            assert_eq!(actual, 2);
        }
        other => panic!("Expected ValueWidthMismatch, got {:?}", other),
    }
}
