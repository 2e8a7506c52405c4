//! File-backed sheet.
//!
//! A workbook is a directory; each sheet lives in `<sheet_name>.json`:
//!
//! ```text
//! {"format": 1, "checksum": <crc32>, "rows": [["Name", "Email"], ["A", "a@x.com"]]}
//! ```
//!
//! The checksum is CRC32 over the compact JSON encoding of `rows` and is
//! verified on open. Every mutation is persisted before it returns:
//! the new contents go to a temporary file which is fsynced and renamed
//! over the sheet file.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::{StorageError, StorageResult};
use super::memory::MemorySheet;
use super::sheet::SheetStore;

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SheetDocument {
    format: u32,
    checksum: u32,
    rows: Vec<Vec<String>>,
}

fn rows_checksum(rows: &[Vec<String>]) -> StorageResult<u32> {
    let bytes = serde_json::to_vec(rows)
        .map_err(|e| StorageError::data_corruption(format!("Failed to encode rows: {}", e)))?;
    let mut hasher = Hasher::new();
    hasher.update(&bytes);
    Ok(hasher.finalize())
}

/// Path of a sheet file inside a workbook directory
pub fn sheet_path(workbook_dir: &Path, sheet_name: &str) -> PathBuf {
    workbook_dir.join(format!("{}.json", sheet_name))
}

/// A sheet persisted as a checksummed JSON document.
#[derive(Debug)]
pub struct FileSheet {
    path: PathBuf,
    sheet: MemorySheet,
}

impl FileSheet {
    /// Opens an existing sheet.
    ///
    /// # Errors
    ///
    /// `SheetNotFound` if the file is missing, `DataCorruption` if it does
    /// not parse or its checksum does not match.
    pub fn open(workbook_dir: &Path, sheet_name: &str) -> StorageResult<Self> {
        let path = sheet_path(workbook_dir, sheet_name);
        if !path.exists() {
            return Err(StorageError::sheet_not_found(sheet_name));
        }

        let content = fs::read(&path).map_err(|e| {
            StorageError::read_failed(format!("Failed to read sheet: {}", path.display()), e)
        })?;
        let doc: SheetDocument = serde_json::from_slice(&content).map_err(|e| {
            StorageError::data_corruption(format!("Malformed sheet {}: {}", path.display(), e))
        })?;

        if doc.format != FORMAT_VERSION {
            return Err(StorageError::data_corruption(format!(
                "Unsupported sheet format {} in {}",
                doc.format,
                path.display()
            )));
        }
        let actual = rows_checksum(&doc.rows)?;
        if actual != doc.checksum {
            return Err(StorageError::data_corruption(format!(
                "Checksum mismatch in {}: expected {}, found {}",
                path.display(),
                doc.checksum,
                actual
            )));
        }

        debug!(path = %path.display(), rows = doc.rows.len(), "sheet opened");
        Ok(Self {
            path,
            sheet: MemorySheet::from_rows(doc.rows),
        })
    }

    /// Creates a new sheet holding `header` as row 1 (or nothing when
    /// `header` is empty). Creates the workbook directory if missing.
    pub fn create<S: AsRef<str>>(
        workbook_dir: &Path,
        sheet_name: &str,
        header: &[S],
    ) -> StorageResult<Self> {
        fs::create_dir_all(workbook_dir).map_err(|e| {
            StorageError::io_error(
                format!("Failed to create workbook directory: {}", workbook_dir.display()),
                e,
            )
        })?;

        let path = sheet_path(workbook_dir, sheet_name);
        if path.exists() {
            return Err(StorageError::sheet_exists(sheet_name));
        }

        let sheet = if header.is_empty() {
            MemorySheet::new()
        } else {
            MemorySheet::with_header(header)
        };
        persist(&path, &sheet)?;
        Ok(Self { path, sheet })
    }

    /// Location of the sheet file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` to a copy of the grid, persists it, then adopts it.
    fn mutate<F>(&mut self, change: F) -> StorageResult<()>
    where
        F: FnOnce(&mut MemorySheet) -> StorageResult<()>,
    {
        let mut next = self.sheet.clone();
        change(&mut next)?;
        persist(&self.path, &next)?;
        self.sheet = next;
        Ok(())
    }
}

fn persist(path: &Path, sheet: &MemorySheet) -> StorageResult<()> {
    let rows = sheet.rows().to_vec();
    let doc = SheetDocument {
        format: FORMAT_VERSION,
        checksum: rows_checksum(&rows)?,
        rows,
    };
    let bytes = serde_json::to_vec(&doc)
        .map_err(|e| StorageError::data_corruption(format!("Failed to encode sheet: {}", e)))?;

    let tmp_path = path.with_extension("json.tmp");
    let write_err = |e: std::io::Error| {
        StorageError::write_failed(format!("Failed to write {}", tmp_path.display()), e)
    };

    let mut file = File::create(&tmp_path).map_err(write_err)?;
    file.write_all(&bytes).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(|e| {
        StorageError::write_failed(format!("Failed to replace {}", path.display()), e)
    })
}

impl SheetStore for FileSheet {
    fn last_row(&self) -> StorageResult<usize> {
        self.sheet.last_row()
    }

    fn last_column(&self) -> StorageResult<usize> {
        self.sheet.last_column()
    }

    fn read_range(
        &self,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> StorageResult<Vec<Vec<String>>> {
        self.sheet.read_range(row, col, rows, cols)
    }

    fn write_cell(&mut self, row: usize, col: usize, value: &str) -> StorageResult<()> {
        self.mutate(|sheet| sheet.write_cell(row, col, value))
    }

    fn append_row(&mut self, values: Vec<String>) -> StorageResult<()> {
        self.mutate(|sheet| sheet.append_row(values))
    }

    fn delete_row(&mut self, row: usize) -> StorageResult<()> {
        self.mutate(|sheet| sheet.delete_row(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_create_then_reopen() {
        let dir = TempDir::new().unwrap();
        let mut sheet = FileSheet::create(dir.path(), "Sheet1", &["Name", "Email"]).unwrap();
        sheet
            .append_row(vec!["A".to_string(), "a@x.com".to_string()])
            .unwrap();

        let reopened = FileSheet::open(dir.path(), "Sheet1").unwrap();
        assert_eq!(reopened.last_row().unwrap(), 2);
        assert_eq!(reopened.header_row().unwrap(), vec!["Name", "Email"]);
        assert_eq!(reopened.read_cell(2, 2).unwrap(), "a@x.com");
    }

    #[test]
    fn test_open_missing_sheet() {
        let dir = TempDir::new().unwrap();
        let err = FileSheet::open(dir.path(), "Nope").unwrap_err();
        assert_eq!(err.code(), StorageErrorCode::SheetNotFound);
    }

    #[test]
    fn test_create_existing_sheet_rejected() {
        let dir = TempDir::new().unwrap();
        FileSheet::create(dir.path(), "Sheet1", &["Name"]).unwrap();
        let err = FileSheet::create(dir.path(), "Sheet1", &["Name"]).unwrap_err();
        assert_eq!(err.code(), StorageErrorCode::SheetExists);
    }

    #[test]
    fn test_checksum_mismatch_detected() {
        let dir = TempDir::new().unwrap();
        let sheet = FileSheet::create(dir.path(), "Sheet1", &["Name", "Email"]).unwrap();
        let path = sheet.path().to_path_buf();

        let content = fs::read_to_string(&path).unwrap();
        fs::write(&path, content.replace("Email", "Emall")).unwrap();

        let err = FileSheet::open(dir.path(), "Sheet1").unwrap_err();
        assert_eq!(err.code(), StorageErrorCode::DataCorruption);
    }

    #[test]
    fn test_failed_mutation_leaves_sheet_untouched() {
        let dir = TempDir::new().unwrap();
        let mut sheet = FileSheet::create(dir.path(), "Sheet1", &["Name"]).unwrap();
        assert!(sheet.delete_row(5).is_err());
        assert_eq!(sheet.header_row().unwrap(), vec!["Name"]);
    }
}
