use serde::{Deserialize, Serialize};

use crate::types::{
    HEADER_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE, PAGE_SIZE_OFFSET, SQLITE_MAGIC,
    error::DatabaseError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16le,
    Utf16be,
}

impl TextEncoding {
    pub fn from_u32(value: u32) -> Result<Self, DatabaseError> {
        match value {
            // Zero only appears in files that have never stored text.
            0 | 1 => Ok(TextEncoding::Utf8),
            2 => Ok(TextEncoding::Utf16le),
            3 => Ok(TextEncoding::Utf16be),
            other => Err(DatabaseError::InvalidHeader {
                reason: format!("Unknown text encoding: {}", other),
            }),
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            TextEncoding::Utf8 => 1,
            TextEncoding::Utf16le => 2,
            TextEncoding::Utf16be => 3,
        }
    }
}

/// The 100-byte header at the start of every database file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseHeader {
    pub magic: [u8; 16],
    pub page_size: u32,
    pub file_format_write_version: u8,
    pub file_format_read_version: u8,
    pub reserved_space: u8,
    pub max_embedded_payload_fraction: u8,
    pub min_embedded_payload_fraction: u8,
    pub leaf_payload_fraction: u8,
    pub file_change_counter: u32,
    pub database_size_pages: u32,
    pub freelist_trunk_page: u32,
    pub freelist_pages_count: u32,
    pub schema_cookie: u32,
    pub schema_format_number: u32,
    pub default_page_cache_size: u32,
    pub largest_root_btree_page: u32,
    pub text_encoding: TextEncoding,
    pub user_version: u32,
    pub incremental_vacuum_mode: u32,
    pub application_id: u32,
    pub version_valid_for: u32,
    pub sqlite_version_number: u32,
}

impl DatabaseHeader {
    /// A header for a freshly created file with the given page size.
    pub fn new(page_size: u32) -> Self {
        Self {
            magic: *SQLITE_MAGIC,
            page_size,
            file_format_write_version: 1,
            file_format_read_version: 1,
            reserved_space: 0,
            max_embedded_payload_fraction: 64,
            min_embedded_payload_fraction: 32,
            leaf_payload_fraction: 32,
            file_change_counter: 1,
            database_size_pages: 1,
            freelist_trunk_page: 0,
            freelist_pages_count: 0,
            schema_cookie: 1,
            schema_format_number: 4,
            default_page_cache_size: 0,
            largest_root_btree_page: 0,
            text_encoding: TextEncoding::Utf8,
            user_version: 0,
            incremental_vacuum_mode: 0,
            application_id: 0,
            version_valid_for: 1,
            sqlite_version_number: 3_045_000,
        }
    }

    /// Bytes available for cells on each page.
    pub fn usable_page_size(&self) -> u32 {
        self.page_size - u32::from(self.reserved_space)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(HEADER_SIZE);

        buffer.extend_from_slice(&self.magic);
        // 65536 is stored as 1
        let stored_page_size = if self.page_size == MAX_PAGE_SIZE {
            1u16
        } else {
            self.page_size as u16
        };
        buffer.extend_from_slice(&stored_page_size.to_be_bytes());
        buffer.push(self.file_format_write_version);
        buffer.push(self.file_format_read_version);
        buffer.push(self.reserved_space);
        buffer.push(self.max_embedded_payload_fraction);
        buffer.push(self.min_embedded_payload_fraction);
        buffer.push(self.leaf_payload_fraction);
        buffer.extend_from_slice(&self.file_change_counter.to_be_bytes());
        buffer.extend_from_slice(&self.database_size_pages.to_be_bytes());
        buffer.extend_from_slice(&self.freelist_trunk_page.to_be_bytes());
        buffer.extend_from_slice(&self.freelist_pages_count.to_be_bytes());
        buffer.extend_from_slice(&self.schema_cookie.to_be_bytes());
        buffer.extend_from_slice(&self.schema_format_number.to_be_bytes());
        buffer.extend_from_slice(&self.default_page_cache_size.to_be_bytes());
        buffer.extend_from_slice(&self.largest_root_btree_page.to_be_bytes());
        buffer.extend_from_slice(&self.text_encoding.as_u32().to_be_bytes());
        buffer.extend_from_slice(&self.user_version.to_be_bytes());
        buffer.extend_from_slice(&self.incremental_vacuum_mode.to_be_bytes());
        buffer.extend_from_slice(&self.application_id.to_be_bytes());
        buffer.extend_from_slice(&[0u8; 20]); // reserved for expansion
        buffer.extend_from_slice(&self.version_valid_for.to_be_bytes());
        buffer.extend_from_slice(&self.sqlite_version_number.to_be_bytes());

        buffer.resize(HEADER_SIZE, 0);
        buffer
    }

    pub fn from_bytes(bytes: &[u8], verify_magic: bool) -> Result<Self, DatabaseError> {
        if bytes.len() < HEADER_SIZE {
            return Err(DatabaseError::InvalidHeader {
                reason: format!("Header too short: {} bytes", bytes.len()),
            });
        }

        let mut magic = [0u8; 16];
        magic.copy_from_slice(&bytes[0..16]);
        if verify_magic && &magic != SQLITE_MAGIC {
            return Err(DatabaseError::InvalidHeader {
                reason: "Invalid SQLite magic string".to_string(),
            });
        }

        let page_size = page_size_from_bytes(bytes)?;
        let mut offset = PAGE_SIZE_OFFSET + 2;

        let file_format_write_version = bytes[offset];
        offset += 1;
        let file_format_read_version = bytes[offset];
        offset += 1;
        let reserved_space = bytes[offset];
        offset += 1;
        let max_embedded_payload_fraction = bytes[offset];
        offset += 1;
        let min_embedded_payload_fraction = bytes[offset];
        offset += 1;
        let leaf_payload_fraction = bytes[offset];
        offset += 1;

        let file_change_counter = read_u32(bytes, &mut offset);
        let database_size_pages = read_u32(bytes, &mut offset);
        let freelist_trunk_page = read_u32(bytes, &mut offset);
        let freelist_pages_count = read_u32(bytes, &mut offset);
        let schema_cookie = read_u32(bytes, &mut offset);
        let schema_format_number = read_u32(bytes, &mut offset);
        let default_page_cache_size = read_u32(bytes, &mut offset);
        let largest_root_btree_page = read_u32(bytes, &mut offset);
        let text_encoding = TextEncoding::from_u32(read_u32(bytes, &mut offset))?;
        let user_version = read_u32(bytes, &mut offset);
        let incremental_vacuum_mode = read_u32(bytes, &mut offset);
        let application_id = read_u32(bytes, &mut offset);
        offset += 20;
        let version_valid_for = read_u32(bytes, &mut offset);
        let sqlite_version_number = read_u32(bytes, &mut offset);

        Ok(Self {
            magic,
            page_size,
            file_format_write_version,
            file_format_read_version,
            reserved_space,
            max_embedded_payload_fraction,
            min_embedded_payload_fraction,
            leaf_payload_fraction,
            file_change_counter,
            database_size_pages,
            freelist_trunk_page,
            freelist_pages_count,
            schema_cookie,
            schema_format_number,
            default_page_cache_size,
            largest_root_btree_page,
            text_encoding,
            user_version,
            incremental_vacuum_mode,
            application_id,
            version_valid_for,
            sqlite_version_number,
        })
    }
}

/// Reads the big-endian page size at bytes 16..18, where 1 stands for 65536.
pub fn page_size_from_bytes(bytes: &[u8]) -> Result<u32, DatabaseError> {
    let raw = match bytes.get(PAGE_SIZE_OFFSET..PAGE_SIZE_OFFSET + 2) {
        Some(pair) => u16::from_be_bytes([pair[0], pair[1]]),
        None => {
            return Err(DatabaseError::InvalidHeader {
                reason: "Header too short for page size".to_string(),
            });
        }
    };

    let page_size = if raw == 1 { MAX_PAGE_SIZE } else { u32::from(raw) };
    if !page_size.is_power_of_two() || !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(DatabaseError::InvalidHeader {
            reason: format!("Unsupported page size: {}", raw),
        });
    }
    Ok(page_size)
}

fn read_u32(bytes: &[u8], offset: &mut usize) -> u32 {
    let value = u32::from_be_bytes([
        bytes[*offset],
        bytes[*offset + 1],
        bytes[*offset + 2],
        bytes[*offset + 3],
    ]);
    *offset += 4;
    value
}
