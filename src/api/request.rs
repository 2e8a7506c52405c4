//! API request types
//!
//! Requests arrive as one JSON object: `{ "action": ..., ...payload }`.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::errors::{ApiError, ApiResult};

/// First storage row that can hold data
pub const FIRST_DATA_ROW: usize = 2;

/// Default page size for read
pub const DEFAULT_LIMIT: i64 = 10_000;

/// The four record verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    /// Exact, case-sensitive lookup. `del` is the wire name for delete;
    /// `delete` is accepted as well.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "create" => Some(Action::Create),
            "read" => Some(Action::Read),
            "update" => Some(Action::Update),
            "del" | "delete" => Some(Action::Delete),
            _ => None,
        }
    }

    /// Canonical wire name
    pub fn name(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "del",
        }
    }
}

/// Create request
#[derive(Debug, Clone, Default)]
pub struct CreateRequest {
    pub fields: Map<String, Value>,
}

/// Read request. Positions are signed so out-of-range input can be
/// clamped instead of rejected.
#[derive(Debug, Clone)]
pub struct ReadRequest {
    pub start_row: i64,
    pub limit: i64,
}

impl Default for ReadRequest {
    fn default() -> Self {
        Self {
            start_row: FIRST_DATA_ROW as i64,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Update request
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    /// Target row, `None` when the supplied id is not a row position
    pub id: Option<usize>,
    pub fields: Map<String, Value>,
}

/// Delete request
#[derive(Debug, Clone, Default)]
pub struct DeleteRequest {
    /// Target row, `None` when the supplied id is not a row position
    pub id: Option<usize>,
}

/// Parsed request envelope
#[derive(Debug, Clone)]
pub enum Request {
    Create(CreateRequest),
    Read(ReadRequest),
    Update(UpdateRequest),
    Delete(DeleteRequest),
}

/// Raw request for parsing
#[derive(Debug, Deserialize)]
struct RawRequest {
    #[serde(default)]
    action: Option<Value>,
    #[serde(default)]
    fields: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, rename = "startRow")]
    start_row: Option<Value>,
    #[serde(default)]
    limit: Option<Value>,
}

impl Request {
    /// Parse a request from a JSON string
    pub fn parse(json: &str) -> ApiResult<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ApiError::invalid_request(format!("Invalid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Parse a request from an already decoded JSON value
    pub fn from_value(value: Value) -> ApiResult<Self> {
        if !value.is_object() {
            return Err(ApiError::invalid_request("request must be a JSON object"));
        }
        let raw: RawRequest = serde_json::from_value(value)
            .map_err(|e| ApiError::invalid_request(format!("Invalid JSON: {}", e)))?;
        Self::from_raw(raw)
    }

    /// The verb this request invokes
    pub fn action(&self) -> Action {
        match self {
            Request::Create(_) => Action::Create,
            Request::Read(_) => Action::Read,
            Request::Update(_) => Action::Update,
            Request::Delete(_) => Action::Delete,
        }
    }

    fn from_raw(raw: RawRequest) -> ApiResult<Self> {
        let name = raw.action.as_ref().and_then(Value::as_str);
        let action = name
            .and_then(Action::from_name)
            .ok_or_else(|| ApiError::UnknownAction(name.map(str::to_string)))?;

        let request = match action {
            Action::Create => Request::Create(CreateRequest {
                fields: parse_fields(raw.fields)?,
            }),
            Action::Read => {
                let defaults = ReadRequest::default();
                Request::Read(ReadRequest {
                    start_row: parse_number("startRow", raw.start_row)?
                        .unwrap_or(defaults.start_row),
                    limit: parse_number("limit", raw.limit)?.unwrap_or(defaults.limit),
                })
            }
            Action::Update => Request::Update(UpdateRequest {
                id: parse_row_id(raw.id.as_ref()),
                fields: parse_fields(raw.fields)?,
            }),
            Action::Delete => Request::Delete(DeleteRequest {
                id: parse_row_id(raw.id.as_ref()),
            }),
        };
        Ok(request)
    }
}

fn parse_fields(fields: Option<Value>) -> ApiResult<Map<String, Value>> {
    match fields {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ApiError::invalid_request("fields must be an object")),
    }
}

fn parse_number(name: &str, value: Option<Value>) -> ApiResult<Option<i64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => integer_value(&v)
            .map(Some)
            .ok_or_else(|| ApiError::invalid_request(format!("{} must be an integer", name))),
    }
}

fn parse_row_id(value: Option<&Value>) -> Option<usize> {
    value
        .and_then(integer_value)
        .and_then(|n| usize::try_from(n).ok())
}

/// Integer from a JSON number or numeric string. Fractional values and
/// anything else yield `None`.
fn integer_value(value: &Value) -> Option<i64> {
    let f = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            n.as_f64()?
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(i);
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    (f.fract() == 0.0 && f.is_finite() && f.abs() < i64::MAX as f64).then_some(f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create() {
        let json = r#"{"action": "create", "fields": {"Name": "A", "Email": "a@x.com"}}"#;
        match Request::parse(json).unwrap() {
            Request::Create(r) => {
                assert_eq!(r.fields.len(), 2);
                assert_eq!(r.fields["Email"], "a@x.com");
            }
            other => panic!("Expected Create, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_read_defaults() {
        match Request::parse(r#"{"action": "read"}"#).unwrap() {
            Request::Read(r) => {
                assert_eq!(r.start_row, 2);
                assert_eq!(r.limit, 10_000);
            }
            other => panic!("Expected Read, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_read_numeric_strings() {
        match Request::parse(r#"{"action": "read", "startRow": "5", "limit": 3}"#).unwrap() {
            Request::Read(r) => {
                assert_eq!(r.start_row, 5);
                assert_eq!(r.limit, 3);
            }
            other => panic!("Expected Read, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_read_rejects_non_numeric_limit() {
        let err = Request::parse(r#"{"action": "read", "limit": "many"}"#).unwrap_err();
        assert_eq!(err.code(), "SHEETDB_INVALID_REQUEST");
    }

    #[test]
    fn test_parse_delete_aliases() {
        for name in ["del", "delete"] {
            let json = format!(r#"{{"action": "{}", "id": 3}}"#, name);
            let req = Request::parse(&json).unwrap();
            assert_eq!(req.action(), Action::Delete);
        }
    }

    #[test]
    fn test_row_id_coercion() {
        assert_eq!(parse_row_id(Some(&Value::from(4))), Some(4));
        assert_eq!(parse_row_id(Some(&Value::from("4"))), Some(4));
        assert_eq!(parse_row_id(Some(&Value::from(4.0))), Some(4));
        assert_eq!(parse_row_id(Some(&Value::from(4.5))), None);
        assert_eq!(parse_row_id(Some(&Value::from(-1))), None);
        assert_eq!(parse_row_id(Some(&Value::from("abc"))), None);
        assert_eq!(parse_row_id(None), None);
    }

    #[test]
    fn test_unknown_or_missing_action() {
        let err = Request::parse(r#"{"action": "Create"}"#).unwrap_err();
        assert!(matches!(err, ApiError::UnknownAction(Some(ref a)) if a == "Create"));

        let err = Request::parse(r#"{"fields": {}}"#).unwrap_err();
        assert!(matches!(err, ApiError::UnknownAction(None)));
    }

    #[test]
    fn test_malformed_body() {
        let err = Request::parse("not json").unwrap_err();
        assert!(err.to_string().starts_with("Invalid request"));

        let err = Request::parse("[1, 2]").unwrap_err();
        assert_eq!(err.code(), "SHEETDB_INVALID_REQUEST");
    }

    #[test]
    fn test_fields_must_be_object() {
        let err = Request::parse(r#"{"action": "create", "fields": [1]}"#).unwrap_err();
        assert_eq!(err.code(), "SHEETDB_INVALID_REQUEST");
    }
}
