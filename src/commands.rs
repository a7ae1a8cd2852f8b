use std::io::Write;

use crate::{
    storage::database::{Database, DecodedPage},
    types::{PageIndex, error::DatabaseError, page::PageType},
};

pub const HELP_TEXT: &str = r#"
Available commands:
  .dbinfo          - Show page size and number of schema objects
  .tables          - List tables
  .schema          - Show the CREATE statement of every schema object
  .rows TABLE      - Print the rows stored on TABLE's root page
  .page N          - Dump header, cell pointers and rows of page N
  .help            - Show this help message
  .quit            - Exit

Use '\' at the end of a line for multiline input.
Use Up/Down arrows to navigate command history.
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    DbInfo,
    Tables,
    Schema,
    Rows(String),
    Page(PageIndex),
    Help,
    Quit,
}

impl Command {
    pub fn parse(input: &str) -> Result<Self, DatabaseError> {
        let mut parts = input.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let argument = parts.next();
        let unknown = || DatabaseError::UnknownCommand {
            command: input.trim().to_string(),
        };
        if parts.next().is_some() {
            return Err(unknown());
        }

        match (name.to_lowercase().as_str(), argument) {
            (".dbinfo", None) => Ok(Command::DbInfo),
            (".tables", None) => Ok(Command::Tables),
            (".schema", None) => Ok(Command::Schema),
            (".rows", Some(table)) => Ok(Command::Rows(table.to_string())),
            (".page", Some(index)) => index.parse().map(Command::Page).map_err(|_| unknown()),
            (".help" | ".h", None) => Ok(Command::Help),
            (".quit" | ".exit" | ".q", None) => Ok(Command::Quit),
            _ => Err(unknown()),
        }
    }
}

/// Runs one command, writing its output to `out`. Returns `false` once the
/// session should end.
pub fn execute<W: Write>(
    database: &mut Database,
    command: &Command,
    out: &mut W,
) -> Result<bool, DatabaseError> {
    match command {
        Command::DbInfo => {
            let info = database.info()?;
            writeln!(out, "database page size: {}", info.page_size)?;
            writeln!(out, "number of tables: {}", info.table_count)?;
        }
        Command::Tables => {
            let schema = database.schema()?;
            writeln!(out, "{}", schema.table_names().join(" "))?;
        }
        Command::Schema => {
            let schema = database.schema()?;
            for entry in &schema.entries {
                if let Some(sql) = &entry.sql {
                    writeln!(out, "{};", sql)?;
                }
            }
        }
        Command::Rows(table) => {
            let page = database.table_rows(table)?;
            write_rows(&page, out)?;
        }
        Command::Page(page_index) => write_page(database, *page_index, out)?,
        Command::Help => write!(out, "{}", HELP_TEXT)?,
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

fn write_rows<W: Write>(page: &DecodedPage, out: &mut W) -> Result<(), DatabaseError> {
    for row in &page.rows {
        writeln!(out, "{}", row)?;
    }
    for failure in &page.failures {
        writeln!(
            out,
            "error: cell at offset {}: {}",
            failure.cell_offset, failure.error
        )?;
    }
    Ok(())
}

fn write_page<W: Write>(
    database: &mut Database,
    page_index: PageIndex,
    out: &mut W,
) -> Result<(), DatabaseError> {
    let layout = database.page_layout(page_index)?;
    let header = &layout.header;

    writeln!(
        out,
        "page {}: {}, {} cells",
        page_index, header.page_type, header.cell_count
    )?;
    writeln!(
        out,
        "freeblock start: {}, cell content start: {}, fragmented bytes: {}",
        header.freeblock_start,
        header.content_area_start(),
        header.fragmented_free_bytes
    )?;
    if let Some(right) = header.right_most_pointer {
        writeln!(out, "right-most pointer: {}", right)?;
    }
    let pointers: Vec<String> = layout.cell_pointers.iter().map(u16::to_string).collect();
    writeln!(out, "cell pointers: {}", pointers.join(" "))?;

    if header.page_type == PageType::LeafTable {
        let page = database.decode_page(page_index)?;
        write_rows(&page, out)?;
        writeln!(out, "fingerprint: {:#010x}", page.fingerprint()?)?;
    }
    Ok(())
}
