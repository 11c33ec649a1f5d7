//! Conversion between Firestore REST typed values and plain JSON
//!
//! Firestore wraps every value in a single-key object naming its type
//! (`{"stringValue": "x"}`, `{"integerValue": "42"}`, ...). API responses expose
//! documents as plain JSON objects, so decoding unwraps these.

use serde_json::{json, Map, Value};

use super::{FieldValue, StoreError, StoreResult};

/// Encode a written field as a Firestore value
///
/// Server timestamps are not values at all; they travel as field transforms,
/// so this returns `None` for them.
pub fn encode_field(value: &FieldValue) -> Option<Value> {
    match value {
        FieldValue::String(s) => Some(json!({ "stringValue": s })),
        FieldValue::ServerTimestamp => None,
    }
}

/// Decode a Firestore `fields` object into a plain JSON map
pub fn decode_fields(fields: &Map<String, Value>) -> StoreResult<Map<String, Value>> {
    fields
        .iter()
        .map(|(name, value)| Ok((name.clone(), decode_value(value)?)))
        .collect()
}

pub fn decode_value(value: &Value) -> StoreResult<Value> {
    let object = value
        .as_object()
        .ok_or_else(|| StoreError::Decode(format!("expected typed value, got {}", value)))?;

    let (kind, inner) = object
        .iter()
        .next()
        .ok_or_else(|| StoreError::Decode("empty typed value".to_string()))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" | "doubleValue" | "stringValue" | "timestampValue" | "referenceValue"
        | "bytesValue" => Ok(inner.clone()),
        // int64 values are transported as decimal strings
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| StoreError::Decode(format!("invalid integerValue '{}': {}", s, e))),
            other => Ok(other.clone()),
        },
        "geoPointValue" => Ok(json!({
            "latitude": inner.get("latitude").cloned().unwrap_or(Value::from(0.0)),
            "longitude": inner.get("longitude").cloned().unwrap_or(Value::from(0.0)),
        })),
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(Value::Array(values)) => values
                    .iter()
                    .map(decode_value)
                    .collect::<StoreResult<Vec<_>>>()?,
                _ => Vec::new(),
            };
            Ok(Value::Array(values))
        }
        "mapValue" => match inner.get("fields") {
            Some(Value::Object(fields)) => Ok(Value::Object(decode_fields(fields)?)),
            _ => Ok(Value::Object(Map::new())),
        },
        other => Err(StoreError::Decode(format!("unsupported value type '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_scalar_values() {
        assert_eq!(
            decode_value(&json!({"stringValue": "Sofa"})).unwrap(),
            json!("Sofa")
        );
        assert_eq!(
            decode_value(&json!({"integerValue": "42"})).unwrap(),
            json!(42)
        );
        assert_eq!(
            decode_value(&json!({"doubleValue": 1.5})).unwrap(),
            json!(1.5)
        );
        assert_eq!(
            decode_value(&json!({"booleanValue": true})).unwrap(),
            json!(true)
        );
        assert_eq!(
            decode_value(&json!({"nullValue": null})).unwrap(),
            Value::Null
        );
        assert_eq!(
            decode_value(&json!({"timestampValue": "2024-05-01T10:00:00.123456Z"})).unwrap(),
            json!("2024-05-01T10:00:00.123456Z")
        );
    }

    #[test]
    fn test_decode_nested_values() {
        let value = json!({
            "mapValue": {
                "fields": {
                    "tags": {"arrayValue": {"values": [{"stringValue": "oak"}, {"integerValue": "3"}]}},
                    "empty": {"arrayValue": {}},
                    "origin": {"geoPointValue": {"latitude": 12.9, "longitude": 77.6}}
                }
            }
        });

        assert_eq!(
            decode_value(&value).unwrap(),
            json!({
                "tags": ["oak", 3],
                "empty": [],
                "origin": {"latitude": 12.9, "longitude": 77.6}
            })
        );
    }

    #[test]
    fn test_decode_rejects_untyped_values() {
        assert!(matches!(
            decode_value(&json!("plain")),
            Err(StoreError::Decode(_))
        ));
        assert!(matches!(
            decode_value(&json!({"integerValue": "forty"})),
            Err(StoreError::Decode(_))
        ));
        assert!(matches!(
            decode_value(&json!({"weirdValue": 1})),
            Err(StoreError::Decode(_))
        ));
    }

    #[test]
    fn test_encode_field() {
        assert_eq!(
            encode_field(&FieldValue::String("Desk".to_string())),
            Some(json!({"stringValue": "Desk"}))
        );
        assert_eq!(encode_field(&FieldValue::ServerTimestamp), None);
    }
}
