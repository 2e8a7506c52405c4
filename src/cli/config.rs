//! Configuration file
//!
//! ```json
//! {
//!   "workbook_dir": "./data",
//!   "sheet_name": "Sheet1",
//!   "unique_column": 2,
//!   "http": { "host": "127.0.0.1", "port": 8787 }
//! }
//! ```
//!
//! Loaded once at startup; nothing here is consulted per request.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::api::ServiceConfig;
use crate::http_server::HttpServerConfig;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workbook directory holding one file per sheet (required)
    pub workbook_dir: PathBuf,

    /// Sheet to serve (default "Sheet1")
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// 1-based column whose values must be unique (default 1)
    #[serde(default = "default_unique_column")]
    pub unique_column: usize,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_sheet_name() -> String {
    "Sheet1".to_string()
}

fn default_unique_column() -> usize {
    1
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.unique_column == 0 {
            return Err(CliError::config_error("unique_column must be >= 1"));
        }

        if self.sheet_name.trim().is_empty() {
            return Err(CliError::config_error("sheet_name must not be empty"));
        }
        if self
            .sheet_name
            .chars()
            .any(|c| c == '/' || c == '\\' || c == '\0')
            || self.sheet_name == "."
            || self.sheet_name == ".."
        {
            return Err(CliError::config_error(format!(
                "Invalid sheet_name: '{}'",
                self.sheet_name
            )));
        }

        if self.http.port == 0 {
            return Err(CliError::config_error("http.port must be > 0"));
        }

        Ok(())
    }

    /// Service configuration for the API handler
    pub fn service_config(&self) -> CliResult<ServiceConfig> {
        let unique_column = NonZeroUsize::new(self.unique_column)
            .ok_or_else(|| CliError::config_error("unique_column must be >= 1"))?;
        Ok(ServiceConfig::new(unique_column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_defaults() {
        let config = Config::from_json(r#"{"workbook_dir": "/tmp/wb"}"#).unwrap();
        assert_eq!(config.sheet_name, "Sheet1");
        assert_eq!(config.unique_column, 1);
        assert_eq!(config.http, HttpServerConfig::default());
        assert_eq!(config.service_config().unwrap().unique_column.get(), 1);
    }

    #[test]
    fn test_missing_workbook_dir_rejected() {
        assert!(Config::from_json(r#"{"sheet_name": "S"}"#).is_err());
    }

    #[test]
    fn test_zero_unique_column_rejected() {
        let err = Config::from_json(r#"{"workbook_dir": "/tmp/wb", "unique_column": 0}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unique_column"));
    }

    #[test]
    fn test_sheet_name_with_separator_rejected() {
        let err = Config::from_json(r#"{"workbook_dir": "/tmp/wb", "sheet_name": "../x"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("sheet_name"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sheetdb.json");
        fs::write(
            &path,
            r#"{"workbook_dir": "/tmp/wb", "unique_column": 2, "http": {"port": 9001}}"#,
        )
        .unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.unique_column, 2);
        assert_eq!(config.http.port, 9001);
        assert_eq!(config.http.host, "0.0.0.0");
    }
}
