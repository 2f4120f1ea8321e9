//! Opaque collection record and identifiers.
//!
//! # Responsibility
//! - Wrap one table-store row as a field map plus its optional identifier.
//! - Decode rows into typed projections on demand.
//!
//! # Invariants
//! - `id` mirrors the row's `id` field; the field itself stays in `fields`.
//! - Rows without a usable `id` are listable but never selectable.

use log::warn;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field name carrying the row identifier.
pub const ID_FIELD: &str = "id";

/// Row identifier, normalized to text.
///
/// Hosted tables key rows by integers or UUID strings; both compare by their
/// textual form so `RecordId::from(2)` matches a row whose id is `2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Extracts an identifier from a JSON scalar.
    ///
    /// Returns `None` for null, empty strings and non-scalar values.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => Some(Self(number.to_string())),
            Value::String(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Self(trimmed.to_string()))
                }
            }
            _ => None,
        }
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<i32> for RecordId {
    fn from(value: i32) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&RecordId> for RecordId {
    fn from(value: &RecordId) -> Self {
        value.clone()
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value)
            .ok_or_else(|| de::Error::custom(format!("invalid record id `{value}`")))
    }
}

/// Deserializes an optional `id` column, mapping unusable values to `None`.
pub(crate) fn lenient_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<RecordId>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(RecordId::from_value(&value))
}

/// Named table-like group of records in the hosted store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Collection(String);

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Collection {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Collection {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Record shape and projection errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Row payload was not a JSON object.
    NotAnObject(&'static str),
    /// Typed projection failed.
    Decode(String),
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject(kind) => write!(f, "record row must be an object, got {kind}"),
            Self::Decode(message) => write!(f, "record decode failed: {message}"),
        }
    }
}

impl Error for RecordError {}

/// One row of a collection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    id: Option<RecordId>,
    fields: Map<String, Value>,
}

impl Record {
    /// Builds a record from a field map, extracting `id` when present.
    ///
    /// An `id` that is neither a number nor a non-empty string is treated as
    /// absent; the row stays listable.
    pub fn from_fields(fields: Map<String, Value>) -> Result<Self, RecordError> {
        let id = match fields.get(ID_FIELD) {
            None | Some(Value::Null) => None,
            Some(value) => {
                let id = RecordId::from_value(value);
                if id.is_none() {
                    warn!(
                        "event=record_id module=model status=ignored kind={} value={}",
                        json_kind(value),
                        value
                    );
                }
                id
            }
        };
        Ok(Self { id, fields })
    }

    /// Builds a record from one JSON row.
    pub fn from_row(row: Value) -> Result<Self, RecordError> {
        match row {
            Value::Object(fields) => Self::from_fields(fields),
            other => Err(RecordError::NotAnObject(json_kind(&other))),
        }
    }

    /// Builds records from a JSON array body, preserving arrival order.
    pub fn list_from_rows(rows: Value) -> Result<Vec<Self>, RecordError> {
        match rows {
            Value::Array(items) => items.into_iter().map(Self::from_row).collect(),
            other => Err(RecordError::NotAnObject(json_kind(&other))),
        }
    }

    pub fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns a non-empty string field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Decodes the row into a typed projection.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, RecordError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|err| RecordError::Decode(err.to_string()))
    }

    pub fn into_row(self) -> Value {
        Value::Object(self.fields)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{Record, RecordError, RecordId};
    use serde_json::json;

    #[test]
    fn numeric_and_text_ids_compare_by_text() {
        let record = Record::from_row(json!({"id": 2, "name": "Acme"})).unwrap();
        assert_eq!(record.id(), Some(&RecordId::from(2)));
        assert_eq!(record.id(), Some(&RecordId::from("2")));
    }

    #[test]
    fn rows_without_id_are_accepted() {
        let record = Record::from_row(json!({"title": "Folio"})).unwrap();
        assert!(record.id().is_none());
        assert_eq!(record.text("title"), Some("Folio"));
    }

    #[test]
    fn non_object_rows_are_rejected() {
        let err = Record::from_row(json!("plain")).unwrap_err();
        assert_eq!(err, RecordError::NotAnObject("string"));

        let err = Record::list_from_rows(json!({"id": 1})).unwrap_err();
        assert_eq!(err, RecordError::NotAnObject("object"));
    }

    #[test]
    fn unusable_ids_leave_row_unselectable() {
        for id in [json!(true), json!(""), json!("  "), json!({"n": 1}), json!([1])] {
            let record = Record::from_row(json!({"id": id, "title": "B"})).unwrap();
            assert!(record.id().is_none());
            assert_eq!(record.text("title"), Some("B"));
        }
    }

    #[test]
    fn one_bad_id_keeps_the_rest_of_the_list() {
        let records =
            Record::list_from_rows(json!([{"id": 1}, {"id": ""}, {"id": 3}])).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id(), Some(&RecordId::from(1)));
        assert!(records[1].id().is_none());
        assert_eq!(records[2].id(), Some(&RecordId::from(3)));
    }

    #[test]
    fn text_skips_blank_values() {
        let record = Record::from_row(json!({"id": 1, "link": "  "})).unwrap();
        assert!(record.text("link").is_none());
        assert!(record.text("missing").is_none());
    }
}
