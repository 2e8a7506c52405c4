//! CLI-specific error types

use std::io;

use thiserror::Error;

use crate::storage::StorageError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file missing, malformed or invalid
    #[error("SHEETDB_CLI_CONFIG_ERROR: {0}")]
    Config(String),

    /// stdin/stdout failure
    #[error("SHEETDB_CLI_IO_ERROR: {0}")]
    Io(String),

    /// Opening or creating the sheet failed
    #[error("SHEETDB_CLI_STORAGE_ERROR: {0}")]
    Storage(#[from] StorageError),

    /// Runtime or listener could not start
    #[error("SHEETDB_CLI_BOOT_FAILED: {0}")]
    BootFailed(String),
}

impl CliError {
    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        CliError::Config(msg.into())
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        CliError::Io(msg.into())
    }

    /// Boot failed
    pub fn boot_failed(msg: impl Into<String>) -> Self {
        CliError::BootFailed(msg.into())
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = CliError::config_error("unique_column must be >= 1");
        assert_eq!(
            err.to_string(),
            "SHEETDB_CLI_CONFIG_ERROR: unique_column must be >= 1"
        );
    }

    #[test]
    fn test_storage_error_wrapped() {
        let err = CliError::from(StorageError::sheet_exists("Sheet1"));
        assert!(err.to_string().contains("SHEETDB_SHEET_EXISTS"));
    }
}
