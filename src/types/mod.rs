pub mod error;
pub mod page;
pub mod record;
pub mod row;
pub mod serial_type;
pub mod value;

// Common type aliases
pub type PageIndex = u32;
pub type RowId = u64;
pub type SerialCode = u64;

// Constants following the SQLite file format
pub const HEADER_SIZE: usize = 100; // Database header size, page 1 only
pub const SQLITE_MAGIC: &[u8; 16] = b"SQLite format 3\0";
pub const PAGE_SIZE_OFFSET: usize = 16;
pub const MIN_PAGE_SIZE: u32 = 512;
pub const MAX_PAGE_SIZE: u32 = 65536;

pub const LEAF_PAGE_HEADER_SIZE: usize = 8;
pub const INTERIOR_PAGE_HEADER_SIZE: usize = 12;
pub const CELL_POINTER_SIZE: usize = 2;
// Pointer array anchor, relative to the b-tree header, on every page type
pub const CELL_POINTER_ARRAY_OFFSET: usize = LEAF_PAGE_HEADER_SIZE;

pub const MAX_VARINT_LEN: usize = 9;
pub const RECORD_PREFIX_WINDOW: usize = 16; // payload length varint + row-id varint
