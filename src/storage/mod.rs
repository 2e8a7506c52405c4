//! Sheet storage for sheetdb
//!
//! The record service talks to storage only through [`SheetStore`]: a
//! single named sheet of display strings addressed by 1-based row and
//! column. Two backends are provided:
//!
//! - [`MemorySheet`]: an in-memory grid, used by tests and as the working
//!   copy of the file backend
//! - [`FileSheet`]: a grid persisted as a checksummed JSON document inside
//!   a workbook directory, written atomically after every mutation
//!
//! Storage offers row-level atomicity only. It performs no locking; callers
//! that share a sheet across threads must serialize access themselves.

mod errors;
mod file;
mod memory;
mod sheet;

pub use errors::{StorageError, StorageErrorCode, StorageResult};
pub use file::{sheet_path, FileSheet};
pub use memory::MemorySheet;
pub use sheet::SheetStore;
