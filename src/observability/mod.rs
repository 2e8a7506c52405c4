//! Observability for sheetdb
//!
//! Structured logging through `tracing`. Request-level events are emitted
//! by the API handler; this module owns subscriber setup and the typed
//! lifecycle events logged by the CLI and server.
//!
//! The filter defaults to `info` and can be overridden with `RUST_LOG`.

use std::fmt;

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration file parsed and validated
    ConfigLoaded,
    /// Sheet created by `init`
    SheetCreated,
    /// Sheet opened for serving
    SheetOpened,
    /// HTTP listener bound
    ServerListening,
    /// Server stopped accepting requests
    ShutdownComplete,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SheetCreated => "SHEET_CREATED",
            Event::SheetOpened => "SHEET_OPENED",
            Event::ServerListening => "SERVER_LISTENING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Install the global subscriber. Safe to call more than once; later
/// calls are ignored.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log a lifecycle event with string fields
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    let detail = fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ");
    info!(event = event.as_str(), "{}", detail);
}
