use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{RowId, value::Value};

/// One decoded table-leaf cell. Columns are kept in record-header order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub row_id: RowId,
    pub columns: Vec<Value>,
}

impl Row {
    pub fn new(row_id: RowId, columns: Vec<Value>) -> Self {
        Self { row_id, columns }
    }

    pub fn column(&self, index: usize) -> Option<&Value> {
        self.columns.get(index)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.row_id)?;
        for value in &self.columns {
            write!(f, "|{}", value)?;
        }
        Ok(())
    }
}
