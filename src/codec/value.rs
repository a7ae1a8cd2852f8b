use crate::{
    storage::header::TextEncoding,
    types::{error::DatabaseError, serial_type::SerialType, value::Value},
};

/// Decodes one column, treating text as UTF-8.
pub fn decode_value(serial_type: SerialType, bytes: &[u8]) -> Result<Value, DatabaseError> {
    decode_value_with_encoding(serial_type, bytes, TextEncoding::Utf8)
}

/// Decodes one column from exactly `serial_type.width()` bytes.
pub fn decode_value_with_encoding(
    serial_type: SerialType,
    bytes: &[u8],
    encoding: TextEncoding,
) -> Result<Value, DatabaseError> {
    let expected = serial_type.width();
    if bytes.len() != expected {
        return Err(DatabaseError::ValueWidthMismatch {
            expected,
            actual: bytes.len(),
        });
    }

    let value = match serial_type {
        SerialType::Null => Value::Null,
        SerialType::Int8 => Value::Int8(bytes[0] as i8),
        SerialType::Int16 => Value::Int16(i16::from_be_bytes([bytes[0], bytes[1]])),
        SerialType::Int24 => Value::Int24(sign_extend(bytes) as i32),
        SerialType::Int32 => {
            Value::Int32(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        }
        SerialType::Int48 => Value::Int48(sign_extend(bytes)),
        SerialType::Int64 => Value::Int64(sign_extend(bytes)),
        SerialType::Float64 => {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(bytes);
            Value::Real(f64::from_be_bytes(raw))
        }
        SerialType::Zero => Value::Flag(false),
        SerialType::One => Value::Flag(true),
        SerialType::Text(_) => Value::Text(decode_text(bytes, encoding)),
        SerialType::Blob(_) => Value::Blob(bytes.to_vec()),
    };

    Ok(value)
}

/// Big-endian two's complement of 1..=8 bytes, widened using the sign bit of
/// the most significant byte present.
fn sign_extend(bytes: &[u8]) -> i64 {
    let seed: i64 = match bytes.first() {
        Some(b) if b & 0x80 != 0 => -1,
        _ => 0,
    };
    bytes
        .iter()
        .fold(seed, |acc, &b| (acc << 8) | i64::from(b))
}

fn decode_text(bytes: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        TextEncoding::Utf16le => {
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        TextEncoding::Utf16be => {
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
    }
}
