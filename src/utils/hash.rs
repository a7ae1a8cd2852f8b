use crate::types::{error::DatabaseError, row::Row};

/// CRC32 over the bincode encoding of `rows`. Equal row sequences, bit for bit,
/// give equal fingerprints.
pub fn rows_fingerprint(rows: &[Row]) -> Result<u32, DatabaseError> {
    let bytes = bincode::serde::encode_to_vec(rows, bincode::config::standard()).map_err(|e| {
        DatabaseError::SerializationError {
            details: e.to_string(),
        }
    })?;
    Ok(crc32fast::hash(&bytes))
}
