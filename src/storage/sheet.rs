//! The tabular store contract consumed by the record service.
//!
//! Positions are 1-based in both dimensions. Row 1 is the header row.
//! All values are display strings; the caller trims them.

use super::errors::StorageResult;

/// A single named sheet of display-formatted cells.
pub trait SheetStore {
    /// Highest row holding at least one non-empty cell, or 1 when the
    /// sheet is empty. The header row counts as row 1.
    fn last_row(&self) -> StorageResult<usize>;

    /// Highest column holding at least one non-empty cell, or 0 when the
    /// sheet is empty.
    fn last_column(&self) -> StorageResult<usize>;

    /// Reads a `rows` x `cols` block starting at (`row`, `col`).
    ///
    /// Cells outside the populated area read as empty strings, so the
    /// result always has exactly the requested shape.
    fn read_range(
        &self,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> StorageResult<Vec<Vec<String>>>;

    /// Writes one cell, growing the sheet if needed.
    fn write_cell(&mut self, row: usize, col: usize, value: &str) -> StorageResult<()>;

    /// Appends `values` as a new row directly after `last_row()`.
    fn append_row(&mut self, values: Vec<String>) -> StorageResult<()>;

    /// Removes `row`, shifting every later row up by one.
    fn delete_row(&mut self, row: usize) -> StorageResult<()>;

    /// Reads `count` cells of `row` starting at column `col`.
    fn read_row(&self, row: usize, col: usize, count: usize) -> StorageResult<Vec<String>> {
        Ok(self
            .read_range(row, col, 1, count)?
            .into_iter()
            .next()
            .unwrap_or_default())
    }

    /// Reads a single cell.
    fn read_cell(&self, row: usize, col: usize) -> StorageResult<String> {
        Ok(self.read_row(row, col, 1)?.into_iter().next().unwrap_or_default())
    }

    /// Reads row 1 across every populated column.
    fn header_row(&self) -> StorageResult<Vec<String>> {
        let width = self.last_column()?;
        self.read_row(1, 1, width)
    }
}
