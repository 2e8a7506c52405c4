//! In-memory sheet grid.
//!
//! Rows are stored ragged; missing cells read as empty strings. Trailing
//! rows without any non-empty cell do not count toward `last_row`, which
//! matches how a spreadsheet reports its populated extent.

use serde::{Deserialize, Serialize};

use super::errors::{StorageError, StorageResult};
use super::sheet::SheetStore;

/// A sheet held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySheet {
    rows: Vec<Vec<String>>,
}

impl MemorySheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sheet from raw rows, the first being the header
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Create a sheet holding only a header row
    pub fn with_header<S: AsRef<str>>(columns: &[S]) -> Self {
        Self::from_rows(vec![columns.iter().map(|c| c.as_ref().to_string()).collect()])
    }

    /// Raw rows, including trailing blanks
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of leading rows up to and including the last non-blank one.
    fn populated_rows(&self) -> usize {
        self.rows
            .iter()
            .rposition(|row| row.iter().any(|cell| !cell.is_empty()))
            .map_or(0, |idx| idx + 1)
    }

    fn check_position(row: usize, col: usize) -> StorageResult<()> {
        if row == 0 || col == 0 {
            return Err(StorageError::invalid_position(row, col));
        }
        Ok(())
    }
}

impl SheetStore for MemorySheet {
    fn last_row(&self) -> StorageResult<usize> {
        Ok(self.populated_rows().max(1))
    }

    fn last_column(&self) -> StorageResult<usize> {
        Ok(self
            .rows
            .iter()
            .filter_map(|row| row.iter().rposition(|cell| !cell.is_empty()))
            .map(|idx| idx + 1)
            .max()
            .unwrap_or(0))
    }

    fn read_range(
        &self,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> StorageResult<Vec<Vec<String>>> {
        Self::check_position(row, col)?;

        let block = (row..row + rows)
            .map(|r| {
                let source = self.rows.get(r - 1);
                (col..col + cols)
                    .map(|c| {
                        source
                            .and_then(|cells| cells.get(c - 1))
                            .cloned()
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        Ok(block)
    }

    fn write_cell(&mut self, row: usize, col: usize, value: &str) -> StorageResult<()> {
        Self::check_position(row, col)?;

        if self.rows.len() < row {
            self.rows.resize_with(row, Vec::new);
        }
        let cells = &mut self.rows[row - 1];
        if cells.len() < col {
            cells.resize_with(col, String::new);
        }
        cells[col - 1] = value.to_string();
        Ok(())
    }

    fn append_row(&mut self, values: Vec<String>) -> StorageResult<()> {
        let populated = self.populated_rows();
        self.rows.truncate(populated);
        self.rows.push(values);
        Ok(())
    }

    fn delete_row(&mut self, row: usize) -> StorageResult<()> {
        if row == 0 || row > self.rows.len() {
            return Err(StorageError::invalid_position(row, 1));
        }
        self.rows.remove(row - 1);
        Ok(())
    }
}
