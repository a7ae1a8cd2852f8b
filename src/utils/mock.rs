//! Byte-exact database files for tests and benchmarks.

use std::io::Write;

use tempfile::NamedTempFile;

use crate::{
    codec::varint,
    storage::header::{DatabaseHeader, TextEncoding},
    types::{
        CELL_POINTER_ARRAY_OFFSET, CELL_POINTER_SIZE, HEADER_SIZE, MAX_PAGE_SIZE, PageIndex, RowId,
        SerialCode, error::DatabaseError, page::PageType, value::Value,
    },
};

/// Serial code and body bytes for one value, in the width the variant names.
pub fn encode_value(value: &Value) -> (SerialCode, Vec<u8>) {
    match value {
        Value::Null => (0, Vec::new()),
        Value::Int8(v) => (1, v.to_be_bytes().to_vec()),
        Value::Int16(v) => (2, v.to_be_bytes().to_vec()),
        Value::Int24(v) => (3, v.to_be_bytes()[1..].to_vec()),
        Value::Int32(v) => (4, v.to_be_bytes().to_vec()),
        Value::Int48(v) => (5, v.to_be_bytes()[2..].to_vec()),
        Value::Int64(v) => (6, v.to_be_bytes().to_vec()),
        Value::Real(v) => (7, v.to_be_bytes().to_vec()),
        Value::Flag(false) => (8, Vec::new()),
        Value::Flag(true) => (9, Vec::new()),
        Value::Blob(bytes) => (bytes.len() as u64 * 2 + 12, bytes.clone()),
        Value::Text(s) => (s.len() as u64 * 2 + 13, s.as_bytes().to_vec()),
    }
}

/// Record body (header + column bytes) without the cell prefix.
pub fn encode_payload(columns: &[Value]) -> Vec<u8> {
    let mut codes = Vec::new();
    let mut body = Vec::new();
    for value in columns {
        let (code, bytes) = encode_value(value);
        varint::encode(code, &mut codes);
        body.extend_from_slice(&bytes);
    }

    // The header length counts its own varint, which may grow it by a byte.
    let codes_len = codes.len() as u64;
    let mut header_length = codes_len + 1;
    while header_length != codes_len + varint::encoded_len(header_length) as u64 {
        header_length = codes_len + varint::encoded_len(header_length) as u64;
    }

    let mut payload = Vec::with_capacity(header_length as usize + body.len());
    varint::encode(header_length, &mut payload);
    payload.extend_from_slice(&codes);
    payload.extend_from_slice(&body);
    payload
}

/// A complete table-leaf cell: payload length, row-id, then the record.
pub fn encode_record(row_id: RowId, columns: &[Value]) -> Vec<u8> {
    let payload = encode_payload(columns);
    let mut cell = Vec::with_capacity(payload.len() + 18);
    varint::encode(payload.len() as u64, &mut cell);
    varint::encode(row_id, &mut cell);
    cell.extend_from_slice(&payload);
    cell
}

#[derive(Debug, Clone)]
pub struct FixturePage {
    pub page_type: PageType,
    pub right_most_pointer: Option<u32>,
    pub cells: Vec<Vec<u8>>,
    /// Pointers written after the ones for `cells`, pointing wherever they say.
    pub extra_pointers: Vec<u16>,
}

impl FixturePage {
    pub fn new(page_type: PageType) -> Self {
        let right_most_pointer = page_type.is_interior().then_some(0);
        Self {
            page_type,
            right_most_pointer,
            cells: Vec::new(),
            extra_pointers: Vec::new(),
        }
    }

    pub fn leaf_table() -> Self {
        Self::new(PageType::LeafTable)
    }

    pub fn interior_table(right_most_pointer: u32) -> Self {
        let mut page = Self::new(PageType::InteriorTable);
        page.right_most_pointer = Some(right_most_pointer);
        page
    }

    pub fn with_row(mut self, row_id: RowId, columns: &[Value]) -> Self {
        self.cells.push(encode_record(row_id, columns));
        self
    }

    pub fn with_raw_cell(mut self, cell: Vec<u8>) -> Self {
        self.cells.push(cell);
        self
    }

    /// Interior table cell: left child page number and its largest row-id.
    pub fn with_child(mut self, left_child: u32, key: RowId) -> Self {
        let mut cell = left_child.to_be_bytes().to_vec();
        varint::encode(key, &mut cell);
        self.cells.push(cell);
        self
    }

    pub fn with_extra_pointer(mut self, pointer: u16) -> Self {
        self.extra_pointers.push(pointer);
        self
    }

    /// Writes the page with cells packed down from `usable_size`. The pointer
    /// array goes 8 bytes after the header start on every page type, so on an
    /// interior page with cells it overwrites the leading right-pointer bytes.
    fn write_into(
        &self,
        page: &mut [u8],
        header_offset: usize,
        usable_size: usize,
    ) -> Result<(), DatabaseError> {
        let page_size = page.len();
        let pointer_count = self.cells.len() + self.extra_pointers.len();
        let pointer_array_start = header_offset + CELL_POINTER_ARRAY_OFFSET;
        let pointer_array_end = pointer_array_start + pointer_count * CELL_POINTER_SIZE;

        let mut content_start = usable_size.min(page_size);
        let mut pointers = Vec::with_capacity(pointer_count);
        for cell in &self.cells {
            if content_start < pointer_array_end + cell.len() {
                return Err(DatabaseError::SerializationError {
                    details: format!("fixture cells do not fit a {}-byte page", page_size),
                });
            }
            content_start -= cell.len();
            page[content_start..content_start + cell.len()].copy_from_slice(cell);
            pointers.push(content_start as u16);
        }
        pointers.extend_from_slice(&self.extra_pointers);

        let header = &mut page[header_offset..];
        header[0] = self.page_type.as_u8();
        header[1..3].copy_from_slice(&0u16.to_be_bytes());
        header[3..5].copy_from_slice(&(pointer_count as u16).to_be_bytes());
        // 65536 is stored as zero
        let stored_start = if content_start == MAX_PAGE_SIZE as usize {
            0
        } else {
            content_start as u16
        };
        header[5..7].copy_from_slice(&stored_start.to_be_bytes());
        header[7] = 0;
        if let Some(right) = self.right_most_pointer {
            header[8..12].copy_from_slice(&right.to_be_bytes());
        }

        let mut offset = pointer_array_start;
        for pointer in pointers {
            page[offset..offset + CELL_POINTER_SIZE].copy_from_slice(&pointer.to_be_bytes());
            offset += CELL_POINTER_SIZE;
        }
        Ok(())
    }
}

/// In-memory image of a database file; page 1 is always the schema page.
#[derive(Debug, Clone)]
pub struct FixtureDatabase {
    pub header: DatabaseHeader,
    pub pages: Vec<FixturePage>,
}

impl FixtureDatabase {
    pub fn new(page_size: u32) -> Self {
        Self {
            header: DatabaseHeader::new(page_size),
            pages: vec![FixturePage::leaf_table()],
        }
    }

    pub fn with_text_encoding(mut self, encoding: TextEncoding) -> Self {
        self.header.text_encoding = encoding;
        self
    }

    /// Appends a page and returns its 1-based index.
    pub fn add_page(&mut self, page: FixturePage) -> PageIndex {
        self.pages.push(page);
        self.pages.len() as PageIndex
    }

    pub fn page_mut(&mut self, page_index: PageIndex) -> Option<&mut FixturePage> {
        self.pages.get_mut(page_index.checked_sub(1)? as usize)
    }

    /// Adds a table page holding `rows` and lists it in the schema page.
    pub fn with_table(mut self, name: &str, sql: &str, rows: &[(RowId, Vec<Value>)]) -> Self {
        let page = rows
            .iter()
            .fold(FixturePage::leaf_table(), |page, (row_id, columns)| {
                page.with_row(*row_id, columns)
            });
        let root_page = self.add_page(page);
        let root_value = match i8::try_from(root_page) {
            Ok(small) => Value::Int8(small),
            Err(_) => Value::Int32(root_page as i32),
        };

        let schema_row_id = self.pages[0].cells.len() as RowId + 1;
        self.pages[0].cells.push(encode_record(
            schema_row_id,
            &[
                Value::Text("table".to_string()),
                Value::Text(name.to_string()),
                Value::Text(name.to_string()),
                root_value,
                Value::Text(sql.to_string()),
            ],
        ));
        self
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DatabaseError> {
        let page_size = self.header.page_size as usize;
        let usable_size = self.header.usable_page_size() as usize;
        let mut header = self.header.clone();
        header.database_size_pages = self.pages.len() as u32;

        let mut bytes = vec![0u8; page_size * self.pages.len()];
        bytes[..HEADER_SIZE].copy_from_slice(&header.to_bytes());

        for (i, page) in self.pages.iter().enumerate() {
            let start = i * page_size;
            let header_offset = if i == 0 { HEADER_SIZE } else { 0 };
            page.write_into(&mut bytes[start..start + page_size], header_offset, usable_size)?;
        }
        Ok(bytes)
    }

    pub fn write_temp(&self) -> Result<NamedTempFile, DatabaseError> {
        let mut file = NamedTempFile::new()?;
        file.write_all(&self.to_bytes()?)?;
        file.flush()?;
        Ok(file)
    }
}
