use crate::{
    codec::{value::decode_value_with_encoding, varint},
    storage::header::TextEncoding,
    types::{
        error::DatabaseError,
        record::{RawRecord, RecordHeader},
        row::Row,
        serial_type::SerialType,
    },
};

/// Splits a raw record into its row-id and the ordered serial codes of its columns.
///
/// The header-length varint counts itself, so decoding stops exactly
/// `header_length` bytes after the header's first byte.
pub fn parse_record_header(record: &RawRecord) -> Result<RecordHeader, DatabaseError> {
    let bytes = &record.bytes;
    let (row_id, _) = varint::decode_at(bytes, record.payload_length_len)?;

    let header_start = record.header_start();
    let (header_length, length_len) =
        varint::decode_at(bytes, header_start).map_err(|_| DatabaseError::MalformedHeader {
            reason: format!(
                "record at cell offset {} has no header length",
                record.cell_offset
            ),
        })?;

    if header_length < length_len as u64 {
        return Err(DatabaseError::MalformedHeader {
            reason: format!(
                "header length {} shorter than its own varint ({} bytes)",
                header_length, length_len
            ),
        });
    }

    let header_end = header_start as u64 + header_length;
    if header_end > bytes.len() as u64 {
        return Err(DatabaseError::MalformedHeader {
            reason: format!(
                "header length {} runs past the {}-byte record",
                header_length,
                bytes.len()
            ),
        });
    }
    let header_end = header_end as usize;

    let mut column_codes = Vec::new();
    let mut cursor = header_start + length_len;
    while cursor < header_end {
        let (code, consumed) = varint::decode(&bytes[cursor..header_end]).map_err(|_| {
            DatabaseError::MalformedHeader {
                reason: format!(
                    "serial code at byte {} overruns header ending at byte {}",
                    cursor, header_end
                ),
            }
        })?;
        column_codes.push(code);
        cursor += consumed;
    }

    Ok(RecordHeader {
        row_id,
        header_length,
        column_codes,
        body_start: header_end,
    })
}

/// Decodes every column in header order, advancing a cursor through the body.
pub fn assemble_row(
    record: &RawRecord,
    header: &RecordHeader,
    encoding: TextEncoding,
) -> Result<Row, DatabaseError> {
    let bytes = &record.bytes;
    let mut columns = Vec::with_capacity(header.column_codes.len());
    let mut cursor = header.body_start;

    for (index, &code) in header.column_codes.iter().enumerate() {
        let serial_type = SerialType::resolve(code)?;
        let width = serial_type.width();
        let end = match cursor.checked_add(width) {
            Some(end) if end <= bytes.len() => end,
            _ => {
                return Err(DatabaseError::MalformedRecord {
                    reason: format!(
                        "column {} needs {} bytes from byte {} but the record is {} bytes",
                        index,
                        width,
                        cursor,
                        bytes.len()
                    ),
                });
            }
        };

        columns.push(decode_value_with_encoding(
            serial_type,
            &bytes[cursor..end],
            encoding,
        )?);
        cursor = end;
    }

    Ok(Row::new(header.row_id, columns))
}

pub fn decode_record(record: &RawRecord, encoding: TextEncoding) -> Result<Row, DatabaseError> {
    let header = parse_record_header(record)?;
    assemble_row(record, &header, encoding)
}
