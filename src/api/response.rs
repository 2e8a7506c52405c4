//! API response envelope
//!
//! Success: `{ success: true, fields: ["id", ...], records: [...], totalRecords }`
//! Failure: `{ success: false, message }`

use serde::Serialize;

use crate::schema::{Record, Schema};

/// Message for an id that is not an existing data row
pub const INVALID_ROW_MESSAGE: &str = "ID/baris tidak valid";

/// Message for a value already present in the unique column
pub fn duplicate_message(column: &str) -> String {
    format!("{} sudah ada, harus unik", column)
}

/// Response envelope shared by every action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<Record>>,
    /// Number of records in this response, not in storage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_records: Option<usize>,
}

impl Response {
    /// Successful result carrying `records` under `schema`
    pub fn records(schema: &Schema, records: Vec<Record>) -> Self {
        Self {
            success: true,
            message: None,
            fields: Some(schema.field_names()),
            total_records: Some(records.len()),
            records: Some(records),
        }
    }

    /// Failed result with a caller-facing message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            fields: None,
            records: None,
            total_records: None,
        }
    }

    /// Check if this is a success response
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Convert to a JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"success":false,"message":{}}}"#,
                serde_json::Value::String(e.to_string())
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::format_row;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let schema = Schema::from_header(&["Name", "Email"]);
        let resp = Response::records(&schema, vec![format_row(&["A", "a@x.com"], 2)]);
        let value: serde_json::Value = serde_json::from_str(&resp.to_json()).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "fields": ["id", "Name", "Email"],
                "records": [[2, "A", "a@x.com"]],
                "totalRecords": 1
            })
        );
    }

    #[test]
    fn test_failure_shape() {
        let resp = Response::failure(duplicate_message("Email"));
        let value: serde_json::Value = serde_json::from_str(&resp.to_json()).unwrap();
        assert_eq!(
            value,
            json!({"success": false, "message": "Email sudah ada, harus unik"})
        );
        assert!(!resp.is_success());
    }
}
