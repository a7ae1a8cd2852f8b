use crate::types::{RowId, SerialCode};

/// Bytes of one table-leaf cell: `[payload len][row-id][header][body]`.
///
/// `bytes.len() == payload_length + payload_length_len + row_id_len` always holds
/// for records produced by the page reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub cell_offset: u16,
    pub payload_length: u64,
    pub payload_length_len: usize,
    pub row_id_len: usize,
    pub bytes: Vec<u8>,
}

impl RawRecord {
    /// Index of the first record-header byte within `bytes`.
    pub fn header_start(&self) -> usize {
        self.payload_length_len + self.row_id_len
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    pub row_id: RowId,
    /// Header size in bytes, counting the header-length varint itself.
    pub header_length: u64,
    pub column_codes: Vec<SerialCode>,
    /// Index within the raw record where the first column's bytes begin.
    pub body_start: usize,
}
