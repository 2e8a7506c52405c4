//! Sheet storage error types
//!
//! Error codes:
//! - SHEETDB_STORAGE_IO_ERROR
//! - SHEETDB_STORAGE_WRITE_FAILED
//! - SHEETDB_STORAGE_READ_FAILED
//! - SHEETDB_SHEET_NOT_FOUND
//! - SHEETDB_SHEET_EXISTS
//! - SHEETDB_INVALID_POSITION
//! - SHEETDB_DATA_CORRUPTION

use std::fmt;
use std::io;

use thiserror::Error;

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Disk I/O failure outside a read or write (e.g. directory creation)
    IoError,
    /// Persisting the sheet failed
    WriteFailed,
    /// Loading the sheet failed
    ReadFailed,
    /// Sheet file does not exist
    SheetNotFound,
    /// Sheet file already exists
    SheetExists,
    /// Row or column position outside the addressable sheet
    InvalidPosition,
    /// Checksum or format mismatch in a sheet file
    DataCorruption,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::IoError => "SHEETDB_STORAGE_IO_ERROR",
            StorageErrorCode::WriteFailed => "SHEETDB_STORAGE_WRITE_FAILED",
            StorageErrorCode::ReadFailed => "SHEETDB_STORAGE_READ_FAILED",
            StorageErrorCode::SheetNotFound => "SHEETDB_SHEET_NOT_FOUND",
            StorageErrorCode::SheetExists => "SHEETDB_SHEET_EXISTS",
            StorageErrorCode::InvalidPosition => "SHEETDB_INVALID_POSITION",
            StorageErrorCode::DataCorruption => "SHEETDB_DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error with code, message and optional I/O cause
#[derive(Debug, Error)]
#[error("{code}: {message}{}", cause_suffix(.source))]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    #[source]
    source: Option<io::Error>,
}

fn cause_suffix(source: &Option<io::Error>) -> String {
    source
        .as_ref()
        .map(|e| format!(" (caused by: {})", e))
        .unwrap_or_default()
}

impl StorageError {
    fn new(code: StorageErrorCode, message: impl Into<String>, source: Option<io::Error>) -> Self {
        Self {
            code,
            message: message.into(),
            source,
        }
    }

    /// Generic I/O failure
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StorageErrorCode::IoError, message, Some(source))
    }

    /// Persisting a sheet failed
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StorageErrorCode::WriteFailed, message, Some(source))
    }

    /// Loading a sheet failed
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StorageErrorCode::ReadFailed, message, Some(source))
    }

    /// The named sheet does not exist in the workbook
    pub fn sheet_not_found(sheet: &str) -> Self {
        Self::new(
            StorageErrorCode::SheetNotFound,
            format!("Sheet not found: {}", sheet),
            None,
        )
    }

    /// The named sheet already exists in the workbook
    pub fn sheet_exists(sheet: &str) -> Self {
        Self::new(
            StorageErrorCode::SheetExists,
            format!("Sheet already exists: {}", sheet),
            None,
        )
    }

    /// A row or column position that cannot be addressed
    pub fn invalid_position(row: usize, col: usize) -> Self {
        Self::new(
            StorageErrorCode::InvalidPosition,
            format!("Invalid cell position: row {}, column {}", row, col),
            None,
        )
    }

    /// Sheet contents failed validation
    pub fn data_corruption(message: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::DataCorruption, message, None)
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
