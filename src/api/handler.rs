//! API Handler for sheetdb
//!
//! Runs the four record verbs against a [`SheetStore`] and folds every
//! outcome, including unexpected errors, into one [`Response`] shape.
//!
//! The handler holds no state between requests besides the store: the
//! schema is re-read from the header row on every call, and ids are plain
//! storage row positions.
//!
//! Nothing here serializes concurrent callers. The uniqueness check and
//! the write that follows it are separate storage calls, so two writers
//! sharing a store can both pass the check. Callers that share a handler
//! must wrap it in a lock (the HTTP server does).

use std::num::NonZeroUsize;

use tracing::{debug, info, warn};

use crate::schema::{cell_text, fetch_row, format_row, is_unique, row_from_fields, Schema};
use crate::storage::SheetStore;

use super::errors::{ApiError, ApiResult};
use super::request::{
    CreateRequest, DeleteRequest, ReadRequest, Request, UpdateRequest, FIRST_DATA_ROW,
};
use super::response::{duplicate_message, Response, INVALID_ROW_MESSAGE};

/// Static service configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// 1-based storage column whose non-empty values must be distinct
    pub unique_column: NonZeroUsize,
}

impl ServiceConfig {
    /// Configuration with the given unique column
    pub fn new(unique_column: NonZeroUsize) -> Self {
        Self { unique_column }
    }
}

/// Record service over a single sheet
pub struct ApiHandler<S: SheetStore> {
    store: S,
    config: ServiceConfig,
}

impl<S: SheetStore> ApiHandler<S> {
    /// Create a new API handler
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    /// Borrow the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the handler, returning the store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Handle a raw JSON request string.
    ///
    /// Never fails: errors become `{success: false, message}`.
    pub fn handle(&mut self, json_request: &str) -> Response {
        let outcome = Request::parse(json_request).and_then(|request| self.dispatch(request));
        self.finish(outcome)
    }

    /// Handle an already decoded request envelope
    pub fn handle_value(&mut self, request: serde_json::Value) -> Response {
        let outcome = Request::from_value(request).and_then(|request| self.dispatch(request));
        self.finish(outcome)
    }

    /// Run a parsed request through its verb
    pub fn dispatch(&mut self, request: Request) -> ApiResult<Response> {
        let action = request.action();
        let response = match request {
            Request::Create(r) => self.create(r),
            Request::Read(r) => self.read(r),
            Request::Update(r) => self.update(r),
            Request::Delete(r) => self.delete(r),
        }?;

        if response.is_success() {
            info!(
                action = action.name(),
                records = response.total_records.unwrap_or(0),
                "request completed"
            );
        } else {
            info!(
                action = action.name(),
                message = response.message.as_deref().unwrap_or_default(),
                "request rejected"
            );
        }
        Ok(response)
    }

    fn finish(&self, outcome: ApiResult<Response>) -> Response {
        match outcome {
            Ok(response) => response,
            Err(e) => {
                warn!(code = e.code(), error = %e, "request failed");
                Response::failure(e.to_string())
            }
        }
    }

    /// Name of the unique column in `schema`.
    ///
    /// The unique column is configured by storage position but looked up
    /// by schema index, so blank header cells before it shift the name.
    fn unique_name<'a>(&self, schema: &'a Schema) -> ApiResult<&'a str> {
        let position = self.config.unique_column.get();
        schema
            .column_at(position)
            .ok_or(ApiError::UniqueColumnOutOfRange {
                position,
                width: schema.len(),
            })
    }

    /// Whether row `row` currently has a non-empty unique value
    fn has_unique_value(&self, row: usize) -> ApiResult<bool> {
        let value = self.store.read_cell(row, self.config.unique_column.get())?;
        Ok(!value.trim().is_empty())
    }

    /// Row position if `id` names an existing data row
    fn data_row(&self, id: Option<usize>) -> ApiResult<Option<usize>> {
        let last_row = self.store.last_row()?;
        Ok(id.filter(|&row| row >= FIRST_DATA_ROW && row <= last_row))
    }

    /// Append one record.
    ///
    /// Flow:
    /// 1. Resolve the unique column name from the header
    /// 2. Reject a non-empty duplicate unique value
    /// 3. Append the row in schema order
    /// 4. Report it only if its unique value is non-empty
    fn create(&mut self, req: CreateRequest) -> ApiResult<Response> {
        let schema = Schema::read(&self.store)?;
        let unique_name = self.unique_name(&schema)?;
        let unique_value = req
            .fields
            .get(unique_name)
            .map(cell_text)
            .unwrap_or_default();

        if !unique_value.is_empty()
            && !is_unique(&self.store, self.config.unique_column.get(), &unique_value, None)?
        {
            return Ok(Response::failure(duplicate_message(unique_name)));
        }

        let row = row_from_fields(&schema, &req.fields);
        self.store.append_row(row.clone())?;
        let id = self.store.last_row()?;
        debug!(id, "row appended");

        let records = if unique_value.is_empty() {
            Vec::new()
        } else {
            vec![format_row(&row, id)]
        };
        Ok(Response::records(&schema, records))
    }

    /// Read one page of records, starting at storage row `start_row`.
    /// Starts below the first data row are raised to it, so the header is
    /// never returned as a record.
    ///
    /// `totalRecords` counts the records returned after filtering; the next
    /// page starts at `start_row + limit`, not at the returned count.
    fn read(&self, req: ReadRequest) -> ApiResult<Response> {
        let schema = Schema::read(&self.store)?;
        let last_row = self.store.last_row()?;
        let start_row = usize::try_from(req.start_row)
            .unwrap_or(0)
            .max(FIRST_DATA_ROW);
        let limit = usize::try_from(req.limit).unwrap_or(0);

        if last_row < FIRST_DATA_ROW || start_row > last_row || limit == 0 {
            return Ok(Response::records(&schema, Vec::new()));
        }

        self.unique_name(&schema)?;
        let unique_idx = self.config.unique_column.get() - 1;
        let count = limit.min(last_row - start_row + 1);

        let records = self
            .store
            .read_range(start_row, 1, count, schema.len())?
            .into_iter()
            .enumerate()
            .filter(|(_, values)| {
                values
                    .get(unique_idx)
                    .is_some_and(|v| !v.trim().is_empty())
            })
            .map(|(offset, values)| format_row(&values, start_row + offset))
            .collect();

        Ok(Response::records(&schema, records))
    }

    /// Partially update one row.
    ///
    /// Only columns present as keys in `fields` are written; an explicit
    /// empty string clears a cell.
    fn update(&mut self, req: UpdateRequest) -> ApiResult<Response> {
        let schema = Schema::read(&self.store)?;
        let Some(row) = self.data_row(req.id)? else {
            return Ok(Response::failure(INVALID_ROW_MESSAGE));
        };

        let unique_name = self.unique_name(&schema)?;
        if let Some(value) = req.fields.get(unique_name) {
            let candidate = cell_text(value);
            if !candidate.is_empty()
                && !is_unique(
                    &self.store,
                    self.config.unique_column.get(),
                    &candidate,
                    Some(row),
                )?
            {
                return Ok(Response::failure(duplicate_message(unique_name)));
            }
        }

        for (idx, column) in schema.columns().iter().enumerate() {
            if let Some(value) = req.fields.get(column) {
                self.store.write_cell(row, idx + 1, &cell_text(value))?;
            }
        }

        let records = if self.has_unique_value(row)? {
            vec![fetch_row(&self.store, &schema, row)?]
        } else {
            Vec::new()
        };
        Ok(Response::records(&schema, records))
    }

    /// Delete one row, returning its content from before the delete.
    /// Every later row moves up by one position.
    fn delete(&mut self, req: DeleteRequest) -> ApiResult<Response> {
        let schema = Schema::read(&self.store)?;
        let Some(row) = self.data_row(req.id)? else {
            return Ok(Response::failure(INVALID_ROW_MESSAGE));
        };
        self.unique_name(&schema)?;

        let records = if self.has_unique_value(row)? {
            vec![fetch_row(&self.store, &schema, row)?]
        } else {
            Vec::new()
        };
        self.store.delete_row(row)?;
        debug!(row, "row deleted");

        Ok(Response::records(&schema, records))
    }
}
