//! CLI command implementations

use std::path::Path;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::run_lines;
use crate::api::ApiHandler;
use crate::http_server::HttpServer;
use crate::observability::{init_tracing, log_event, Event};
use crate::storage::FileSheet;

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    init_tracing();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config, columns } => init(&config, &columns),
        Command::Serve { config, port } => serve(&config, port),
        Command::Exec { config } => exec(&config),
    }
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    log_event(
        Event::ConfigLoaded,
        &[
            ("path", config_path.display().to_string().as_str()),
            ("sheet", config.sheet_name.as_str()),
        ],
    );
    Ok(config)
}

/// Open the configured sheet and wrap it in a handler
pub fn open_handler(config: &Config) -> CliResult<ApiHandler<FileSheet>> {
    let sheet = FileSheet::open(&config.workbook_dir, &config.sheet_name)?;
    log_event(
        Event::SheetOpened,
        &[("path", sheet.path().display().to_string().as_str())],
    );
    Ok(ApiHandler::new(sheet, config.service_config()?))
}

/// Create the workbook directory and the configured sheet.
///
/// Fails if the sheet already exists.
pub fn init(config_path: &Path, columns: &[String]) -> CliResult<()> {
    let config = load_config(config_path)?;
    let sheet = FileSheet::create(&config.workbook_dir, &config.sheet_name, columns)?;
    log_event(
        Event::SheetCreated,
        &[
            ("path", sheet.path().display().to_string().as_str()),
            ("columns", columns.join(",").as_str()),
        ],
    );
    Ok(())
}

/// Serve the record endpoint over HTTP
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
    }

    let handler = open_handler(&config)?;
    let server = HttpServer::new(handler, config.http.clone());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Process newline-delimited requests from stdin until EOF
pub fn exec(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let mut handler = open_handler(&config)?;
    run_lines(|line| handler.handle(line).to_json())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SheetStore;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("sheetdb.json");
        let body = serde_json::json!({
            "workbook_dir": dir.path().join("wb"),
            "unique_column": 2
        });
        fs::write(&path, body.to_string()).unwrap();
        path
    }

    #[test]
    fn test_init_creates_sheet_with_header() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir);

        init(&config_path, &["Name".to_string(), "Email".to_string()]).unwrap();

        let config = Config::load(&config_path).unwrap();
        let handler = open_handler(&config).unwrap();
        assert_eq!(handler.store().header_row().unwrap(), vec!["Name", "Email"]);
    }

    #[test]
    fn test_init_twice_fails() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir);
        init(&config_path, &["Name".to_string()]).unwrap();
        assert!(matches!(
            init(&config_path, &["Name".to_string()]),
            Err(CliError::Storage(_))
        ));
    }

    #[test]
    fn test_open_without_init_fails() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&write_config(&dir)).unwrap();
        assert!(open_handler(&config).is_err());
    }
}
