//! API error types
//!
//! These are the unexpected-tier failures: malformed requests, unknown
//! actions, misconfiguration and storage faults. Expected failures
//! (invalid row, duplicate value) are not errors; handlers return them as
//! ordinary `success: false` responses.
//!
//! `Display` is the caller-facing message. The dispatcher copies it
//! verbatim into the response.

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Unexpected failures surfaced at the dispatcher boundary
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body is not a usable JSON envelope
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Action missing or not one of the supported verbs
    #[error("Action tidak dikenali")]
    UnknownAction(Option<String>),

    /// Configured unique column lies past the end of the header
    #[error("kolom unik di luar jangkauan header")]
    UniqueColumnOutOfRange { position: usize, width: usize },

    /// Storage engine failure
    #[error("{0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Create an invalid request error
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        ApiError::InvalidRequest(reason.into())
    }

    /// Returns the machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "SHEETDB_INVALID_REQUEST",
            ApiError::UnknownAction(_) => "SHEETDB_UNKNOWN_ACTION",
            ApiError::UniqueColumnOutOfRange { .. } => "SHEETDB_UNIQUE_COLUMN_OUT_OF_RANGE",
            ApiError::Storage(e) => e.code().code(),
        }
    }
}
