//! sheetdb - a record service over a header-driven sheet
//!
//! Create, read, update and delete records in a tabular store whose first
//! row is the schema, through a single `{ action, ...payload }` endpoint.

pub mod api;
pub mod cli;
pub mod http_server;
pub mod observability;
pub mod schema;
pub mod storage;
