//! Schema, row codec and uniqueness checks for sheetdb
//!
//! A sheet carries no declared schema. The column list is whatever row 1
//! holds at the moment of the request, and records are positional arrays
//! aligned to it.
//!
//! - [`Schema`]: trimmed, non-empty header cells in storage order
//! - [`Record`]: `[id, ...values]` where `id` is the storage row
//! - [`is_unique`]: live scan of the designated unique column

mod codec;
mod reader;
mod unique;

pub use codec::{cell_text, fetch_row, format_row, row_from_fields, Record};
pub use reader::{Schema, ID_FIELD};
pub use unique::is_unique;
