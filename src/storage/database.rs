use std::{
    fs::File,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{
    executor::{leaf_scan::LeafPageScanner, scan::Scanner},
    storage::{
        config::ReaderConfig,
        header::DatabaseHeader,
        page_reader,
        schema::{Schema, SchemaEntry},
    },
    types::{
        HEADER_SIZE, PageIndex,
        error::DatabaseError,
        page::PageHeader,
        row::Row,
    },
    utils::hash::rows_fingerprint,
};

/// Answer to `.dbinfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseInfo {
    pub path: PathBuf,
    pub page_size: u32,
    pub page_count: u64,
    /// Cell count of the schema page: one cell per schema object.
    pub table_count: u16,
}

/// Header and cell pointers of any page type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    pub page_index: PageIndex,
    pub header: PageHeader,
    pub cell_pointers: Vec<u16>,
}

#[derive(Debug)]
pub struct CellFailure {
    pub cell_offset: u16,
    pub error: DatabaseError,
}

/// Rows of one table leaf page, plus the cells that could not be decoded.
#[derive(Debug)]
pub struct DecodedPage {
    pub page_index: PageIndex,
    pub header: PageHeader,
    pub cell_pointers: Vec<u16>,
    pub rows: Vec<Row>,
    pub failures: Vec<CellFailure>,
}

impl DecodedPage {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn fingerprint(&self) -> Result<u32, DatabaseError> {
        rows_fingerprint(&self.rows)
    }
}

/// Read-only handle on one database file.
pub struct Database {
    path: PathBuf,
    file: File,
    header: DatabaseHeader,
    page_count: u64,
    config: ReaderConfig,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DatabaseError> {
        Self::open_with_config(path, ReaderConfig::default())
    }

    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: ReaderConfig,
    ) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let mut file = File::open(path)?;

        let header_bytes = page_reader::read_exact_at(&mut file, 0, HEADER_SIZE)?;
        let header = DatabaseHeader::from_bytes(&header_bytes, config.verify_magic)?;

        let file_size = file.metadata()?.len();
        let page_count = file_size.div_ceil(u64::from(header.page_size));

        debug!(
            path = %path.display(),
            page_size = header.page_size,
            page_count,
            "opened database"
        );

        Ok(Self {
            path: path.to_path_buf(),
            file,
            header,
            page_count,
            config,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &DatabaseHeader {
        &self.header
    }

    pub fn page_size(&self) -> u32 {
        self.header.page_size
    }

    pub fn page_count(&self) -> u64 {
        self.page_count
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    fn check_page_index(&self, page_index: PageIndex) -> Result<(), DatabaseError> {
        if page_index == 0 || u64::from(page_index) > self.page_count {
            return Err(DatabaseError::InvalidPageIndex {
                page_index,
                page_count: self.page_count,
            });
        }
        Ok(())
    }

    pub fn info(&mut self) -> Result<DatabaseInfo, DatabaseError> {
        let schema_header = self.read_page_header(1)?;
        Ok(DatabaseInfo {
            path: self.path.clone(),
            page_size: self.page_size(),
            page_count: self.page_count,
            table_count: schema_header.cell_count,
        })
    }

    pub fn read_page_header(&mut self, page_index: PageIndex) -> Result<PageHeader, DatabaseError> {
        self.check_page_index(page_index)?;
        page_reader::read_page_header(&mut self.file, self.header.page_size, page_index)
    }

    pub fn page_layout(&mut self, page_index: PageIndex) -> Result<PageLayout, DatabaseError> {
        let header = self.read_page_header(page_index)?;
        let cell_pointers = page_reader::read_cell_pointers(
            &mut self.file,
            &header,
            self.header.page_size,
            page_index,
        )?;
        Ok(PageLayout {
            page_index,
            header,
            cell_pointers,
        })
    }

    /// Scanner over the cells of a table leaf page.
    pub fn scanner(
        &mut self,
        page_index: PageIndex,
    ) -> Result<LeafPageScanner<'_, File>, DatabaseError> {
        self.check_page_index(page_index)?;
        LeafPageScanner::new(&mut self.file, &self.header, page_index, &self.config)
    }

    /// Decodes every cell of a table leaf page. A cell that fails is recorded in
    /// `failures` and does not stop its siblings.
    pub fn decode_page(&mut self, page_index: PageIndex) -> Result<DecodedPage, DatabaseError> {
        let mut scanner = self.scanner(page_index)?;
        let header = scanner.header().clone();
        let cell_pointers = scanner.cell_pointers().to_vec();

        let mut rows = Vec::with_capacity(cell_pointers.len());
        let mut failures = Vec::new();
        loop {
            match scanner.scan() {
                Ok(Some(row)) => rows.push(row),
                Ok(None) => break,
                Err(error) if error.is_record_local() => failures.push(CellFailure {
                    cell_offset: scanner.last_cell_offset().unwrap_or_default(),
                    error,
                }),
                Err(error) => return Err(error),
            }
        }

        debug!(
            page_index,
            rows = rows.len(),
            failures = failures.len(),
            "decoded page"
        );

        Ok(DecodedPage {
            page_index,
            header,
            cell_pointers,
            rows,
            failures,
        })
    }

    /// Decodes page 1 into schema entries. Cells that do not decode into a valid
    /// entry are skipped.
    pub fn schema(&mut self) -> Result<Schema, DatabaseError> {
        let page = self.decode_page(1)?;
        for failure in &page.failures {
            warn!(cell_offset = failure.cell_offset, error = %failure.error, "skipping schema cell");
        }

        let mut entries = Vec::with_capacity(page.rows.len());
        for row in &page.rows {
            match SchemaEntry::from_row(row) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(row_id = row.row_id, error = %e, "skipping schema row"),
            }
        }

        debug!(entries = entries.len(), "decoded schema");
        Ok(Schema::new(entries))
    }

    /// Rows of a table, read from the root page the schema declares for it.
    pub fn table_rows(&mut self, table_name: &str) -> Result<DecodedPage, DatabaseError> {
        let schema = self.schema()?;
        let entry = schema
            .table(table_name)
            .ok_or_else(|| DatabaseError::TableNotFound {
                name: table_name.to_string(),
            })?;

        if entry.root_page == 0 {
            return Err(DatabaseError::CorruptedSchema {
                reason: format!("table '{}' has no root page", entry.name),
            });
        }
        let root_page = entry.root_page;
        self.decode_page(root_page)
    }
}
