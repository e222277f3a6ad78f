//! OTLP attribute value conversion
//!
//! Two conversions exist and they are not the same: `value_to_json` keeps
//! structure (used for streamed payloads), `value_to_string` flattens to
//! the exact-match form used by filter comparisons.

use opentelemetry_proto::tonic::common::v1::{AnyValue, KeyValue, any_value};
use serde_json::{Map, Number, Value};

/// Convert an OTLP attribute list into a JSON object.
///
/// Returns `None` for an empty list so payloads omit the field entirely.
pub fn attrs_to_json(attrs: &[KeyValue]) -> Option<Map<String, Value>> {
    if attrs.is_empty() {
        return None;
    }
    let mut out = Map::with_capacity(attrs.len());
    for kv in attrs {
        let value = kv.value.as_ref().map(value_to_json).unwrap_or(Value::Null);
        out.insert(kv.key.clone(), value);
    }
    Some(out)
}

/// Convert one OTLP value into JSON, recursing into maps and lists.
///
/// Kinds without a natural JSON form (bytes) convert to their string form.
pub fn value_to_json(value: &AnyValue) -> Value {
    match &value.value {
        Some(any_value::Value::StringValue(s)) => Value::String(s.clone()),
        Some(any_value::Value::BoolValue(b)) => Value::Bool(*b),
        Some(any_value::Value::IntValue(i)) => Value::Number((*i).into()),
        Some(any_value::Value::DoubleValue(d)) => Number::from_f64(*d)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(d.to_string())),
        Some(any_value::Value::KvlistValue(kvs)) => {
            Value::Object(attrs_to_json(&kvs.values).unwrap_or_default())
        }
        Some(any_value::Value::ArrayValue(items)) => {
            Value::Array(items.values.iter().map(value_to_json).collect())
        }
        Some(any_value::Value::BytesValue(bytes)) => Value::String(hex_string(bytes)),
        None => Value::Null,
    }
}

/// Stringified form of an OTLP value, for exact-match comparisons.
pub fn value_to_string(value: &AnyValue) -> String {
    match &value.value {
        Some(any_value::Value::StringValue(s)) => s.clone(),
        Some(any_value::Value::BoolValue(b)) => b.to_string(),
        Some(any_value::Value::IntValue(i)) => i.to_string(),
        Some(any_value::Value::DoubleValue(d)) => d.to_string(),
        Some(any_value::Value::KvlistValue(_)) | Some(any_value::Value::ArrayValue(_)) => {
            serde_json::to_string(&value_to_json(value)).unwrap_or_default()
        }
        Some(any_value::Value::BytesValue(bytes)) => hex_string(bytes),
        None => String::new(),
    }
}

fn hex_string(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

#[cfg(test)]
#[path = "attrs_test.rs"]
mod tests;
