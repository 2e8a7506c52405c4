//! API Layer for sheetdb
//!
//! A single endpoint takes `{ action, ...payload }` and answers with a
//! normalized envelope describing success, the record schema and the
//! affected records.
//!
//! # Supported Actions
//!
//! - create
//! - read (paginated by storage row)
//! - update (partial)
//! - del (alias: delete)
//!
//! # Failure tiers
//!
//! Expected failures (invalid row, duplicate unique value) are returned by
//! the verbs as `success: false` responses. Everything else is an
//! [`ApiError`] converted once, at [`ApiHandler::handle`].

mod errors;
mod handler;
mod request;
mod response;

pub use errors::{ApiError, ApiResult};
pub use handler::{ApiHandler, ServiceConfig};
pub use request::{
    Action, CreateRequest, DeleteRequest, ReadRequest, Request, UpdateRequest, DEFAULT_LIMIT,
    FIRST_DATA_ROW,
};
pub use response::{duplicate_message, Response, INVALID_ROW_MESSAGE};
