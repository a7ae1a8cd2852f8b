//! Positioned reads of page headers, cell pointer arrays and raw records.
//!
//! Every offset is derived from one rule: page `n` starts at `(n - 1) * page_size`,
//! its b-tree header sits 100 bytes later on page 1 (after the database header)
//! and at the page start otherwise, and cell pointers are relative to the page
//! start on every page. The pointer array starts 8 bytes into the b-tree
//! header whatever the page type, so on interior pages its first entries
//! share bytes with the right-most pointer.

use std::io::{Read, Seek, SeekFrom};

use tracing::debug;

use crate::{
    codec::varint,
    types::{
        CELL_POINTER_ARRAY_OFFSET, CELL_POINTER_SIZE, HEADER_SIZE, INTERIOR_PAGE_HEADER_SIZE,
        LEAF_PAGE_HEADER_SIZE, MAX_VARINT_LEN, PageIndex, error::DatabaseError, page::PageHeader, record::RawRecord,
    },
};

pub fn page_start(page_size: u32, page_index: PageIndex) -> u64 {
    u64::from(page_index.saturating_sub(1)) * u64::from(page_size)
}

/// Absolute offset of the b-tree page header.
pub fn header_offset(page_size: u32, page_index: PageIndex) -> u64 {
    let start = page_start(page_size, page_index);
    if page_index == 1 {
        start + HEADER_SIZE as u64
    } else {
        start
    }
}

pub fn read_exact_at<R: Read + Seek>(
    reader: &mut R,
    offset: u64,
    len: usize,
) -> Result<Vec<u8>, DatabaseError> {
    let mut buffer = vec![0u8; len];
    reader
        .seek(SeekFrom::Start(offset))
        .and_then(|_| reader.read_exact(&mut buffer))
        .map_err(|source| DatabaseError::ReadFailed {
            offset,
            len,
            source,
        })?;
    Ok(buffer)
}

/// Reads as many bytes as are available up to `len`, stopping early at end of file.
fn read_up_to<R: Read + Seek>(
    reader: &mut R,
    offset: u64,
    len: usize,
) -> Result<Vec<u8>, DatabaseError> {
    let mut buffer = Vec::with_capacity(len);
    reader
        .seek(SeekFrom::Start(offset))
        .and_then(|_| reader.by_ref().take(len as u64).read_to_end(&mut buffer))
        .map_err(|source| DatabaseError::ReadFailed {
            offset,
            len,
            source,
        })?;
    Ok(buffer)
}

pub fn read_page_header<R: Read + Seek>(
    reader: &mut R,
    page_size: u32,
    page_index: PageIndex,
) -> Result<PageHeader, DatabaseError> {
    let offset = header_offset(page_size, page_index);
    let mut bytes = read_exact_at(reader, offset, LEAF_PAGE_HEADER_SIZE)?;

    // Type byte decides whether the 4-byte right pointer follows.
    if matches!(bytes[0], 2 | 5) {
        let tail = read_exact_at(
            reader,
            offset + LEAF_PAGE_HEADER_SIZE as u64,
            INTERIOR_PAGE_HEADER_SIZE - LEAF_PAGE_HEADER_SIZE,
        )?;
        bytes.extend_from_slice(&tail);
    }

    let header = PageHeader::from_bytes(&bytes, page_index)?;
    debug!(
        page_index,
        page_type = %header.page_type,
        cell_count = header.cell_count,
        "read page header"
    );
    Ok(header)
}

pub fn read_cell_pointers<R: Read + Seek>(
    reader: &mut R,
    header: &PageHeader,
    page_size: u32,
    page_index: PageIndex,
) -> Result<Vec<u16>, DatabaseError> {
    let offset = header_offset(page_size, page_index) + CELL_POINTER_ARRAY_OFFSET as u64;
    let len = header.cell_count as usize * CELL_POINTER_SIZE;
    let bytes = read_exact_at(reader, offset, len)?;

    let pointers: Vec<u16> = bytes
        .chunks_exact(CELL_POINTER_SIZE)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();

    debug!(page_index, pointers = pointers.len(), "read cell pointer array");
    Ok(pointers)
}

/// Reads one table-leaf record in two steps: a small window to size it, then
/// exactly `payload_length + payload_length_len + row_id_len` bytes.
///
/// Records must end within the first `usable_size` bytes of the page; the
/// reserved tail of each page never holds cell content.
pub fn read_record<R: Read + Seek>(
    reader: &mut R,
    cell_offset: u16,
    page_size: u32,
    usable_size: u32,
    page_index: PageIndex,
    prefix_window: usize,
) -> Result<RawRecord, DatabaseError> {
    let usable_size = usable_size.min(page_size);
    if u32::from(cell_offset) >= usable_size {
        return Err(DatabaseError::CellOffsetOutOfBounds {
            page_index,
            offset: cell_offset,
        });
    }

    let start = page_start(page_size, page_index);
    let page_end = start + u64::from(usable_size);
    let absolute = start + u64::from(cell_offset);

    let available = page_end - absolute;
    let window = (prefix_window.max(2) as u64).min(available) as usize;
    let mut prefix = read_up_to(reader, absolute, window)?;

    // Widen a window too narrow for the two leading varints.
    let full_window = ((2 * MAX_VARINT_LEN) as u64).min(available) as usize;
    if prefix.len() < full_window && cell_prefix(&prefix).is_err() {
        prefix = read_up_to(reader, absolute, full_window)?;
    }
    let (payload_length, payload_length_len, row_id_len) = cell_prefix(&prefix)?;

    let total = payload_length + (payload_length_len + row_id_len) as u64;
    if absolute + total > page_end {
        return Err(DatabaseError::PayloadOverflow {
            page_index,
            cell_offset,
            len: total,
        });
    }

    let bytes = read_exact_at(reader, absolute, total as usize)?;
    Ok(RawRecord {
        cell_offset,
        payload_length,
        payload_length_len,
        row_id_len,
        bytes,
    })
}

/// Payload length, its varint width and the row-id varint width.
fn cell_prefix(prefix: &[u8]) -> Result<(u64, usize, usize), DatabaseError> {
    let (payload_length, payload_length_len) = varint::decode(prefix)?;
    let (_, row_id_len) = varint::decode_at(prefix, payload_length_len)?;
    Ok((payload_length, payload_length_len, row_id_len))
}
