use std::io::{Read, Seek};

use tracing::{trace, warn};

use crate::{
    codec::record::decode_record,
    executor::scan::Scanner,
    storage::{
        config::ReaderConfig,
        header::{DatabaseHeader, TextEncoding},
        page_reader,
    },
    types::{
        CELL_POINTER_ARRAY_OFFSET, CELL_POINTER_SIZE, PageIndex,
        error::DatabaseError,
        page::{PageHeader, PageType},
        row::Row,
    },
};

/// Decodes the cells of one table leaf page in pointer-array order.
pub struct LeafPageScanner<'a, R: Read + Seek> {
    reader: &'a mut R,
    page_index: PageIndex,
    page_size: u32,
    usable_size: u32,
    header: PageHeader,
    cell_pointers: Vec<u16>,
    position: usize,
    encoding: TextEncoding,
    prefix_window: usize,
    trace_cells: bool,
}

impl<'a, R: Read + Seek> LeafPageScanner<'a, R> {
    pub fn new(
        reader: &'a mut R,
        database_header: &DatabaseHeader,
        page_index: PageIndex,
        config: &ReaderConfig,
    ) -> Result<Self, DatabaseError> {
        let page_size = database_header.page_size;
        let header = page_reader::read_page_header(reader, page_size, page_index)?;
        if header.page_type != PageType::LeafTable {
            return Err(DatabaseError::UnsupportedPageType {
                page_index,
                page_type: header.page_type.to_string(),
            });
        }
        let cell_pointers = page_reader::read_cell_pointers(reader, &header, page_size, page_index)?;

        Ok(Self {
            reader,
            page_index,
            page_size,
            usable_size: database_header.usable_page_size(),
            header,
            cell_pointers,
            position: 0,
            encoding: database_header.text_encoding,
            prefix_window: config.record_prefix_window,
            trace_cells: config.trace_cells,
        })
    }

    pub fn header(&self) -> &PageHeader {
        &self.header
    }

    pub fn cell_pointers(&self) -> &[u16] {
        &self.cell_pointers
    }

    /// Pointer of the cell most recently handed out by `scan`.
    pub fn last_cell_offset(&self) -> Option<u16> {
        self.position
            .checked_sub(1)
            .and_then(|i| self.cell_pointers.get(i).copied())
    }

    /// First page-relative byte a cell may occupy.
    fn cell_area_floor(&self) -> u32 {
        let header_offset = page_reader::header_offset(self.page_size, self.page_index)
            - page_reader::page_start(self.page_size, self.page_index);
        let pointer_array_end = header_offset as usize
            + CELL_POINTER_ARRAY_OFFSET
            + self.cell_pointers.len() * CELL_POINTER_SIZE;
        (pointer_array_end as u32).max(self.header.content_area_start().min(self.page_size))
    }

    fn decode_cell(&mut self, cell_offset: u16) -> Result<Row, DatabaseError> {
        if u32::from(cell_offset) < self.cell_area_floor() {
            return Err(DatabaseError::CellOffsetOutOfBounds {
                page_index: self.page_index,
                offset: cell_offset,
            });
        }

        let record = page_reader::read_record(
            self.reader,
            cell_offset,
            self.page_size,
            self.usable_size,
            self.page_index,
            self.prefix_window,
        )?;
        decode_record(&record, self.encoding)
    }
}

impl<R: Read + Seek> Scanner for LeafPageScanner<'_, R> {
    fn scan(&mut self) -> Result<Option<Row>, DatabaseError> {
        let Some(&cell_offset) = self.cell_pointers.get(self.position) else {
            return Ok(None);
        };
        self.position += 1;

        match self.decode_cell(cell_offset) {
            Ok(row) => {
                if self.trace_cells {
                    trace!(
                        page_index = self.page_index,
                        cell_offset,
                        row_id = row.row_id,
                        columns = row.columns.len(),
                        "decoded cell"
                    );
                }
                Ok(Some(row))
            }
            Err(e) => {
                warn!(page_index = self.page_index, cell_offset, error = %e, "cell decode failed");
                Err(e)
            }
        }
    }

    fn scan_batch(&mut self, batch_size: usize) -> Result<Vec<Row>, DatabaseError> {
        let mut rows = Vec::with_capacity(batch_size);
        for _ in 0..batch_size {
            match self.scan()? {
                Some(row) => rows.push(row),
                None => break,
            }
        }
        Ok(rows)
    }

    fn reset(&mut self) -> Result<(), DatabaseError> {
        self.position = 0;
        Ok(())
    }
}
