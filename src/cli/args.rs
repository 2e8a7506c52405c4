//! CLI argument definitions using clap
//!
//! Commands:
//! - sheetdb init --config <path> [--columns A,B]
//! - sheetdb serve --config <path> [--port <port>]
//! - sheetdb exec --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sheetdb - record service over a header-driven sheet
#[derive(Parser, Debug)]
#[command(name = "sheetdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the workbook directory and an empty sheet
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./sheetdb.json")]
        config: PathBuf,

        /// Header columns for the new sheet
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },

    /// Serve the record endpoint over HTTP
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./sheetdb.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Process newline-delimited JSON requests from stdin
    Exec {
        /// Path to configuration file
        #[arg(long, default_value = "./sheetdb.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
