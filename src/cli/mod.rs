//! CLI module for sheetdb
//!
//! Provides command-line interface for:
//! - init: Create the workbook directory and sheet
//! - serve: Run the HTTP record endpoint
//! - exec: Process line-delimited requests from stdin

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{exec, init, open_handler, run, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliResult};
pub use io::{read_requests, write_json};
