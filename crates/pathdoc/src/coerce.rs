//! Best-effort scalar coercion.
//!
//! Every conversion here is total: a value of the wrong shape collapses to the
//! target type's zero value instead of failing. In particular strings are
//! never parsed, so `"true"` is `false` as a bool and `"42"` is `0` as a
//! number. Whether a value exists at all is the caller's concern.

use serde_json::{Map, Value};

/// `Bool(b)` is `b`; every other value is `false`.
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null | Value::Number(_) | Value::String(_) | Value::Array(_) | Value::Object(_) => {
            false
        }
    }
}

/// Numbers pass through as `f64`; every other value is `0.0`.
pub fn to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::Null | Value::Bool(_) | Value::String(_) | Value::Array(_) | Value::Object(_) => 0.0,
    }
}

/// [`to_f64`] truncated toward zero. Out-of-range values saturate.
pub fn to_i64(value: &Value) -> i64 {
    to_f64(value) as i64
}

/// [`to_f64`] truncated toward zero. Out-of-range values saturate.
pub fn to_i32(value: &Value) -> i32 {
    to_f64(value) as i32
}

/// Strings pass through unchanged; anything else renders as compact JSON.
///
/// The rendering is for humans and is not meant to be parsed back.
pub fn to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// [`to_string`] for a whole mapping, without wrapping it in a `Value`.
pub fn table_to_string(table: &Map<String, Value>) -> String {
    serde_json::to_string(table).unwrap_or_default()
}

/// Human-readable name of a value's kind, for diagnostics.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bool_only_from_bool() {
        assert!(to_bool(&json!(true)));
        assert!(!to_bool(&json!(false)));
        assert!(!to_bool(&json!("true")));
        assert!(!to_bool(&json!("x")));
        assert!(!to_bool(&json!(1)));
        assert!(!to_bool(&Value::Null));
        assert!(!to_bool(&json!({"a": true})));
    }

    #[test]
    fn float_from_numbers_only() {
        assert_eq!(to_f64(&json!(3.5)), 3.5);
        assert_eq!(to_f64(&json!(-2)), -2.0);
        assert_eq!(to_f64(&json!(u64::MAX)), u64::MAX as f64);
        assert_eq!(to_f64(&json!("x")), 0.0);
        assert_eq!(to_f64(&json!("3.5")), 0.0);
        assert_eq!(to_f64(&json!(true)), 0.0);
        assert_eq!(to_f64(&Value::Null), 0.0);
        assert_eq!(to_f64(&json!([1])), 0.0);
    }

    #[test]
    fn ints_truncate_toward_zero() {
        assert_eq!(to_i64(&json!(3.7)), 3);
        assert_eq!(to_i64(&json!(-3.7)), -3);
        assert_eq!(to_i32(&json!(3.7)), 3);
        assert_eq!(to_i32(&json!(-0.9)), 0);
        assert_eq!(to_i64(&json!(42)), 42);
        assert_eq!(to_i64(&json!("7")), 0);
    }

    #[test]
    fn ints_saturate() {
        assert_eq!(to_i32(&json!(1e12)), i32::MAX);
        assert_eq!(to_i32(&json!(-1e12)), i32::MIN);
        assert_eq!(to_i64(&json!(1e300)), i64::MAX);
    }

    #[test]
    fn string_passthrough_and_rendering() {
        assert_eq!(to_string(&json!("plain")), "plain");
        assert_eq!(to_string(&json!("")), "");
        assert_eq!(to_string(&json!(1)), "1");
        assert_eq!(to_string(&json!(2.5)), "2.5");
        assert_eq!(to_string(&json!(false)), "false");
        assert_eq!(to_string(&Value::Null), "null");
        assert_eq!(to_string(&json!([1, "a"])), r#"[1,"a"]"#);
        assert_eq!(to_string(&json!({"k": "v"})), r#"{"k":"v"}"#);
    }

    #[test]
    fn table_renders_like_mapping_value() {
        let value = json!({"b": [1, 2], "a": "x"});
        let Value::Object(table) = &value else { unreachable!() };
        assert_eq!(table_to_string(table), to_string(&value));
        assert_eq!(table_to_string(&Map::new()), "{}");
    }

    #[test]
    fn kind_names() {
        assert_eq!(kind_name(&json!({})), "mapping");
        assert_eq!(kind_name(&json!([])), "sequence");
        assert_eq!(kind_name(&json!("s")), "string");
    }
}
