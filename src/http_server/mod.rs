//! # sheetdb HTTP Server Module
//!
//! Axum transport for the record endpoint. The body of a `POST /` is the
//! raw request envelope; the answer is always `200 OK` with the JSON
//! response envelope.

pub mod config;
pub mod server;

pub use config::HttpServerConfig;
pub use server::{HttpServer, SharedHandler};
