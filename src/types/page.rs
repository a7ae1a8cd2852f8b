use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{
    INTERIOR_PAGE_HEADER_SIZE, LEAF_PAGE_HEADER_SIZE, PageIndex, error::DatabaseError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageType {
    InteriorIndex = 2,
    InteriorTable = 5,
    LeafIndex = 10,
    LeafTable = 13,
}

impl PageType {
    pub fn from_u8(value: u8, page_index: PageIndex) -> Result<Self, DatabaseError> {
        match value {
            2 => Ok(PageType::InteriorIndex),
            5 => Ok(PageType::InteriorTable),
            10 => Ok(PageType::LeafIndex),
            13 => Ok(PageType::LeafTable),
            _ => Err(DatabaseError::UnknownPageType { page_index, value }),
        }
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn is_interior(&self) -> bool {
        matches!(self, PageType::InteriorIndex | PageType::InteriorTable)
    }

    /// Size of the b-tree page header for this page type.
    pub fn header_size(&self) -> usize {
        if self.is_interior() {
            INTERIOR_PAGE_HEADER_SIZE
        } else {
            LEAF_PAGE_HEADER_SIZE
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageType::InteriorIndex => "interior index",
            PageType::InteriorTable => "interior table",
            PageType::LeafIndex => "leaf index",
            PageType::LeafTable => "leaf table",
        };
        f.write_str(name)
    }
}

/*
 * B-tree page header (big-endian)
 * ┌──────────┬────────────────┬────────────┬──────────────────┬────────────┬────────────────┐
 * │ type (1) │ freeblock (2)  │ cells (2)  │ content start(2) │ frag (1)   │ right ptr (4)  │
 * └──────────┴────────────────┴────────────┴──────────────────┴────────────┴────────────────┘
 *                                                                            interior only
 * The cell pointer array follows the header; for page 1 the header itself
 * starts after the 100-byte database header.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageHeader {
    pub page_type: PageType,
    pub freeblock_start: u16,
    pub cell_count: u16,
    pub cell_content_start: u16,
    pub fragmented_free_bytes: u8,
    pub right_most_pointer: Option<u32>,
}

impl PageHeader {
    /// Parses a header from `bytes`, which must start at the header's first byte.
    pub fn from_bytes(bytes: &[u8], page_index: PageIndex) -> Result<Self, DatabaseError> {
        if bytes.len() < LEAF_PAGE_HEADER_SIZE {
            return Err(DatabaseError::MalformedHeader {
                reason: format!(
                    "page header needs {} bytes, got {}",
                    LEAF_PAGE_HEADER_SIZE,
                    bytes.len()
                ),
            });
        }

        let page_type = PageType::from_u8(bytes[0], page_index)?;
        let freeblock_start = u16::from_be_bytes([bytes[1], bytes[2]]);
        let cell_count = u16::from_be_bytes([bytes[3], bytes[4]]);
        let cell_content_start = u16::from_be_bytes([bytes[5], bytes[6]]);
        let fragmented_free_bytes = bytes[7];

        let right_most_pointer = if page_type.is_interior() {
            if bytes.len() < INTERIOR_PAGE_HEADER_SIZE {
                return Err(DatabaseError::MalformedHeader {
                    reason: format!(
                        "interior page header needs {} bytes, got {}",
                        INTERIOR_PAGE_HEADER_SIZE,
                        bytes.len()
                    ),
                });
            }
            Some(u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]))
        } else {
            None
        };

        Ok(Self {
            page_type,
            freeblock_start,
            cell_count,
            cell_content_start,
            fragmented_free_bytes,
            right_most_pointer,
        })
    }

    pub fn header_size(&self) -> usize {
        self.page_type.header_size()
    }

    /// Content area start as stored; a stored zero means 65536.
    pub fn content_area_start(&self) -> u32 {
        match self.cell_content_start {
            0 => 65536,
            start => u32::from(start),
        }
    }
}
