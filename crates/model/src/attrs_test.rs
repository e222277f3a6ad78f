//! Tests for attribute value conversion

use super::*;
use opentelemetry_proto::tonic::common::v1::{
    AnyValue, ArrayValue, KeyValue, KeyValueList, any_value,
};
use serde_json::json;

use crate::testing::str_kv;

fn any(value: any_value::Value) -> AnyValue {
    AnyValue { value: Some(value) }
}

#[test]
fn test_empty_attrs_are_absent() {
    assert!(attrs_to_json(&[]).is_none());
}

#[test]
fn test_scalar_kinds() {
    assert_eq!(
        value_to_json(&any(any_value::Value::StringValue("x".into()))),
        json!("x")
    );
    assert_eq!(value_to_json(&any(any_value::Value::BoolValue(true))), json!(true));
    assert_eq!(value_to_json(&any(any_value::Value::IntValue(7))), json!(7));
    assert_eq!(
        value_to_json(&any(any_value::Value::DoubleValue(1.5))),
        json!(1.5)
    );
}

#[test]
fn test_nested_map_and_list() {
    let value = any(any_value::Value::KvlistValue(KeyValueList {
        values: vec![
            str_kv("inner", "v"),
            KeyValue {
                key: "list".into(),
                value: Some(any(any_value::Value::ArrayValue(ArrayValue {
                    values: vec![
                        any(any_value::Value::IntValue(1)),
                        any(any_value::Value::StringValue("two".into())),
                    ],
                }))),
            },
        ],
    }));

    assert_eq!(
        value_to_json(&value),
        json!({"inner": "v", "list": [1, "two"]})
    );
}

#[test]
fn test_bytes_stringify() {
    let value = any(any_value::Value::BytesValue(vec![0xde, 0xad]));
    assert_eq!(value_to_json(&value), json!("dead"));
    assert_eq!(value_to_string(&value), "dead");
}

#[test]
fn test_value_to_string_scalars() {
    assert_eq!(value_to_string(&any(any_value::Value::StringValue("svc".into()))), "svc");
    assert_eq!(value_to_string(&any(any_value::Value::BoolValue(false))), "false");
    assert_eq!(value_to_string(&any(any_value::Value::IntValue(-3))), "-3");
    assert_eq!(value_to_string(&any(any_value::Value::DoubleValue(2.0))), "2");
}

#[test]
fn test_value_to_string_structured() {
    let value = any(any_value::Value::ArrayValue(ArrayValue {
        values: vec![any(any_value::Value::IntValue(1))],
    }));
    assert_eq!(value_to_string(&value), "[1]");
}

#[test]
fn test_missing_value_is_null() {
    let attrs = [KeyValue {
        key: "empty".into(),
        value: None,
    }];
    let map = attrs_to_json(&attrs).unwrap();
    assert!(map["empty"].is_null());
}
