use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{PageIndex, error::DatabaseError, row::Row, value::Value};

const INTERNAL_PREFIX: &str = "sqlite_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectType {
    Table,
    Index,
    View,
    Trigger,
}

impl ObjectType {
    pub fn from_string(s: &str) -> Result<Self, DatabaseError> {
        match s {
            "table" => Ok(ObjectType::Table),
            "index" => Ok(ObjectType::Index),
            "view" => Ok(ObjectType::View),
            "trigger" => Ok(ObjectType::Trigger),
            other => Err(DatabaseError::CorruptedSchema {
                reason: format!("Unknown schema object type '{}'", other),
            }),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectType::Table => "table",
            ObjectType::Index => "index",
            ObjectType::View => "view",
            ObjectType::Trigger => "trigger",
        };
        f.write_str(name)
    }
}

/// One row of the schema table stored on page 1:
/// `(type, name, tbl_name, rootpage, sql)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub object_type: ObjectType,
    pub name: String,
    pub table_name: String,
    /// Zero for views and triggers, which own no b-tree.
    pub root_page: PageIndex,
    pub sql: Option<String>,
}

impl SchemaEntry {
    pub fn from_row(row: &Row) -> Result<Self, DatabaseError> {
        if row.columns.len() < 5 {
            return Err(DatabaseError::CorruptedSchema {
                reason: format!(
                    "schema row {} has {} columns, expected 5",
                    row.row_id,
                    row.columns.len()
                ),
            });
        }

        let object_type = match &row.columns[0] {
            Value::Text(kind) => ObjectType::from_string(kind)?,
            other => {
                return Err(DatabaseError::CorruptedSchema {
                    reason: format!("Invalid object type in schema: {:?}", other),
                });
            }
        };

        let name = text_column(row, 1, "name")?;
        let table_name = text_column(row, 2, "tbl_name")?;

        let root_page = match &row.columns[3] {
            Value::Null => 0,
            value => value
                .as_integer()
                .and_then(|page| PageIndex::try_from(page).ok())
                .ok_or_else(|| DatabaseError::CorruptedSchema {
                    reason: format!("Invalid root page for '{}': {:?}", name, value),
                })?,
        };

        let sql = match &row.columns[4] {
            Value::Text(sql) => Some(sql.clone()),
            _ => None,
        };

        Ok(Self {
            object_type,
            name,
            table_name,
            root_page,
            sql,
        })
    }

    pub fn is_internal(&self) -> bool {
        self.name.starts_with(INTERNAL_PREFIX)
    }
}

fn text_column(row: &Row, index: usize, field: &str) -> Result<String, DatabaseError> {
    match &row.columns[index] {
        Value::Text(s) => Ok(s.clone()),
        other => Err(DatabaseError::CorruptedSchema {
            reason: format!("Invalid {} in schema: {:?}", field, other),
        }),
    }
}

/// All schema objects listed on page 1, in cell order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub entries: Vec<SchemaEntry>,
}

impl Schema {
    pub fn new(entries: Vec<SchemaEntry>) -> Self {
        Self { entries }
    }

    pub fn tables(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.object_type == ObjectType::Table)
    }

    /// Table names without internal `sqlite_` tables, sorted.
    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .tables()
            .filter(|entry| !entry.is_internal())
            .map(|entry| entry.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Looks a table up by name, ignoring ASCII case like SQL identifiers do.
    pub fn table(&self, name: &str) -> Option<&SchemaEntry> {
        self.tables()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }
}
