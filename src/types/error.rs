use thiserror::Error;

use crate::types::{PageIndex, SerialCode};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Read of {len} bytes at offset {offset} failed: {source}")]
    ReadFailed {
        offset: u64,
        len: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid database header: {reason}")]
    InvalidHeader { reason: String },

    #[error("Page {page_index} out of range (page count: {page_count})")]
    InvalidPageIndex {
        page_index: PageIndex,
        page_count: u64,
    },

    #[error("Unknown page type {value:#04x} on page {page_index}")]
    UnknownPageType { page_index: PageIndex, value: u8 },

    #[error("Page {page_index} is a {page_type} page, rows can only be read from leaf table pages")]
    UnsupportedPageType {
        page_index: PageIndex,
        page_type: String,
    },

    #[error("Cell offset {offset} lies outside the cell content area of page {page_index}")]
    CellOffsetOutOfBounds { page_index: PageIndex, offset: u16 },

    #[error("Record at cell offset {cell_offset} on page {page_index} needs {len} bytes and spills past the page")]
    PayloadOverflow {
        page_index: PageIndex,
        cell_offset: u16,
        len: u64,
    },

    #[error("Truncated varint at byte {offset}")]
    TruncatedVarint { offset: usize },

    #[error("Malformed record header: {reason}")]
    MalformedHeader { reason: String },

    #[error("Malformed record: {reason}")]
    MalformedRecord { reason: String },

    #[error("Reserved serial type {0}")]
    ReservedSerialType(SerialCode),

    #[error("Value width mismatch: expected {expected} bytes, got {actual}")]
    ValueWidthMismatch { expected: usize, actual: usize },

    #[error("Table '{name}' not found")]
    TableNotFound { name: String },

    #[error("Corrupted schema: {reason}")]
    CorruptedSchema { reason: String },

    #[error("Unknown command: {command}")]
    UnknownCommand { command: String },

    #[error("Serialization/deserialization error: {details}")]
    SerializationError { details: String },
}

impl DatabaseError {
    /// True for failures that only affect the record being decoded.
    pub fn is_record_local(&self) -> bool {
        matches!(
            self,
            DatabaseError::ReadFailed { .. }
                | DatabaseError::CellOffsetOutOfBounds { .. }
                | DatabaseError::PayloadOverflow { .. }
                | DatabaseError::TruncatedVarint { .. }
                | DatabaseError::MalformedHeader { .. }
                | DatabaseError::MalformedRecord { .. }
                | DatabaseError::ReservedSerialType(_)
                | DatabaseError::ValueWidthMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
