//! Row codec: raw sheet rows to records and field objects to raw rows.

use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::{Map, Value};

use super::reader::Schema;
use crate::storage::{SheetStore, StorageResult};

/// A record as seen by callers: the storage row position followed by the
/// row's values in schema order.
///
/// Serializes as a flat JSON array `[id, v1, v2, ...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based storage row. Not stored; shifts when rows above are deleted.
    pub id: usize,
    pub values: Vec<String>,
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.values.len() + 1))?;
        seq.serialize_element(&self.id)?;
        for value in &self.values {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

/// Prepend `id` to a trimmed copy of `values`
pub fn format_row<S: AsRef<str>>(values: &[S], id: usize) -> Record {
    Record {
        id,
        values: values.iter().map(|v| v.as_ref().trim().to_string()).collect(),
    }
}

/// Re-read storage row `row` at the current schema width and format it
pub fn fetch_row<S: SheetStore + ?Sized>(
    store: &S,
    schema: &Schema,
    row: usize,
) -> StorageResult<Record> {
    let values = store.read_row(row, 1, schema.len())?;
    Ok(format_row(&values, row))
}

/// Build a raw row for `schema` from a field object.
///
/// Missing fields become empty strings; every value is trimmed.
pub fn row_from_fields(schema: &Schema, fields: &Map<String, Value>) -> Vec<String> {
    schema
        .columns()
        .iter()
        .map(|column| fields.get(column).map(cell_text).unwrap_or_default())
        .collect()
}

/// Convert a JSON field value to trimmed cell text.
///
/// Integral numbers render without a fractional part, `null` is empty,
/// and arrays and objects keep their compact JSON form.
pub fn cell_text(value: &Value) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    };
    text.trim().to_string()
}
