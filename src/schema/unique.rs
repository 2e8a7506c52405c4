//! Single-column uniqueness check.
//!
//! There is no index: every check scans the unique column of all data rows
//! in live storage. Empty candidates are never checked by callers, and
//! empty cells never conflict with a non-empty candidate.

use crate::storage::{SheetStore, StorageResult};

/// Returns true if no data row other than `skip_row` holds `value` in
/// storage column `column` (1-based), comparing trimmed cell text.
pub fn is_unique<S: SheetStore + ?Sized>(
    store: &S,
    column: usize,
    value: &str,
    skip_row: Option<usize>,
) -> StorageResult<bool> {
    let last_row = store.last_row()?;
    if last_row < 2 {
        return Ok(true);
    }

    let cells = store.read_range(2, column, last_row - 1, 1)?;
    let taken = cells
        .iter()
        .enumerate()
        .filter(|(idx, _)| Some(idx + 2) != skip_row)
        .filter_map(|(_, row)| row.first())
        .any(|cell| cell.trim() == value);

    Ok(!taken)
}
