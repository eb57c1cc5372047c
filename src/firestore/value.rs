//! Typed representation of Firestore document fields and the REST v1 wire
//! encoding (`stringValue`, `timestampValue`, …).
//!
//! Posts are moved between collections as their full field map, so decoding
//! must preserve every field the app wrote, not just the ones the jobs read.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;

use super::FirestoreError;

/// A document's field map, keyed by field name.
pub type Fields = BTreeMap<String, Value>;

/// A single Firestore field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Str(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<Value>),
    Map(Fields),
}

impl Value {
    /// Decode a wire-format value object (e.g. `{"stringValue": "hi"}`).
    pub fn from_json(value: &serde_json::Value) -> Result<Self, FirestoreError> {
        let obj = value
            .as_object()
            .ok_or_else(|| FirestoreError::Decode("field value is not an object".into()))?;

        if obj.contains_key("nullValue") {
            return Ok(Value::Null);
        }
        if let Some(b) = obj.get("booleanValue") {
            let b = b
                .as_bool()
                .ok_or_else(|| FirestoreError::Decode("booleanValue is not a bool".into()))?;
            return Ok(Value::Boolean(b));
        }
        if let Some(i) = obj.get("integerValue") {
            // The wire format carries int64 as a decimal string.
            let parsed = match i {
                serde_json::Value::String(s) => s.parse::<i64>().ok(),
                serde_json::Value::Number(n) => n.as_i64(),
                _ => None,
            };
            return parsed.map(Value::Integer).ok_or_else(|| {
                FirestoreError::Decode(format!("integerValue is not an int64: {i}"))
            });
        }
        if let Some(d) = obj.get("doubleValue") {
            let d = d
                .as_f64()
                .ok_or_else(|| FirestoreError::Decode("doubleValue is not a number".into()))?;
            return Ok(Value::Double(d));
        }
        if let Some(s) = obj.get("stringValue") {
            let s = s
                .as_str()
                .ok_or_else(|| FirestoreError::Decode("stringValue is not a string".into()))?;
            return Ok(Value::Str(s.to_string()));
        }
        if let Some(t) = obj.get("timestampValue") {
            let raw = t
                .as_str()
                .ok_or_else(|| FirestoreError::Decode("timestampValue is not a string".into()))?;
            let parsed = DateTime::parse_from_rfc3339(raw).map_err(|e| {
                FirestoreError::Decode(format!("bad timestampValue {raw:?}: {e}"))
            })?;
            return Ok(Value::Timestamp(parsed.with_timezone(&Utc)));
        }
        if let Some(m) = obj.get("mapValue") {
            let fields = match m.get("fields").and_then(|f| f.as_object()) {
                Some(map) => fields_from_json(map)?,
                None => Fields::new(),
            };
            return Ok(Value::Map(fields));
        }
        if let Some(a) = obj.get("arrayValue") {
            let values = match a.get("values").and_then(|v| v.as_array()) {
                Some(items) => items
                    .iter()
                    .map(Value::from_json)
                    .collect::<Result<Vec<_>, _>>()?,
                None => Vec::new(),
            };
            return Ok(Value::Array(values));
        }

        let kind = obj.keys().next().cloned().unwrap_or_default();
        Err(FirestoreError::Decode(format!(
            "unsupported field value kind {kind:?}"
        )))
    }

    /// Encode to the wire format.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => json!({ "nullValue": null }),
            Value::Boolean(b) => json!({ "booleanValue": b }),
            Value::Integer(i) => json!({ "integerValue": i.to_string() }),
            Value::Double(d) => json!({ "doubleValue": d }),
            Value::Str(s) => json!({ "stringValue": s }),
            Value::Timestamp(t) => json!({
                "timestampValue": t.to_rfc3339_opts(SecondsFormat::Micros, true)
            }),
            Value::Array(values) => json!({
                "arrayValue": { "values": values.iter().map(Value::to_json).collect::<Vec<_>>() }
            }),
            Value::Map(fields) => json!({
                "mapValue": { "fields": fields_to_json(fields) }
            }),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Fields> {
        match self {
            Value::Map(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Decode a wire-format `fields` object into a field map.
pub fn fields_from_json(
    map: &serde_json::Map<String, serde_json::Value>,
) -> Result<Fields, FirestoreError> {
    map.iter()
        .map(|(k, v)| Ok((k.clone(), Value::from_json(v)?)))
        .collect()
}

/// Encode a field map into a wire-format `fields` object.
pub fn fields_to_json(fields: &Fields) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = fields
        .iter()
        .map(|(k, v)| (k.clone(), v.to_json()))
        .collect();
    serde_json::Value::Object(map)
}
