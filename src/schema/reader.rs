//! Header-derived schema.
//!
//! The schema is the trimmed, non-empty cells of row 1, in storage order.
//! It is read fresh for every request and never cached, so edits to the
//! header take effect on the next call.

use serde::Serialize;

use crate::storage::{SheetStore, StorageResult};

/// Name of the synthetic leading field carrying the row position
pub const ID_FIELD: &str = "id";

/// Ordered column names of a sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Build a schema from raw header cells, trimming and skipping blanks.
    ///
    /// Positions are compacted: a blank header cell shifts every later
    /// column one slot left in the schema.
    pub fn from_header<S: AsRef<str>>(cells: &[S]) -> Self {
        let columns = cells
            .iter()
            .map(|c| c.as_ref().trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        Self { columns }
    }

    /// Read the schema from row 1 of `store`
    pub fn read<S: SheetStore + ?Sized>(store: &S) -> StorageResult<Self> {
        Ok(Self::from_header(&store.header_row()?))
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the header row had no usable cells
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column name at a 1-based position, if the schema is that wide
    pub fn column_at(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|idx| self.columns.get(idx))
            .map(String::as_str)
    }

    /// Field list reported to callers: `["id", ...columns]`
    pub fn field_names(&self) -> Vec<String> {
        std::iter::once(ID_FIELD.to_string())
            .chain(self.columns.iter().cloned())
            .collect()
    }
}
