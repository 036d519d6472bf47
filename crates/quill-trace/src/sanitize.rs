//! Context sanitization for trace entries
//!
//! Traces record free-form, caller-supplied context for audit purposes.
//! Everything that enters a trace must come back out of a serializer, so
//! this module coerces arbitrary values into a form that is guaranteed to
//! be representable as JSON. Sanitization never fails: every input has a
//! defined, serializable output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Marker substituted for values nested beyond [`MAX_DEPTH`].
///
/// JSON trees in Rust cannot alias, so a reference cycle in caller data
/// surfaces as unbounded nesting by the time it reaches the sanitizer.
/// The depth guard is the tree-shaped equivalent of an ancestor check.
pub const CIRCULAR_MARKER: &str = "[Circular]";

/// Maximum nesting depth retained in sanitized context.
pub const MAX_DEPTH: usize = 32;

/// Sanitize an already-parsed JSON value.
///
/// Scalars pass through untouched; arrays and objects are rebuilt with
/// every element sanitized one level deeper. Anything past [`MAX_DEPTH`]
/// collapses to [`CIRCULAR_MARKER`].
#[must_use]
pub fn sanitize_value(value: &Value) -> Value {
    sanitize_at(value, 0)
}

fn sanitize_at(value: &Value, depth: usize) -> Value {
    if depth >= MAX_DEPTH {
        return Value::String(CIRCULAR_MARKER.to_string());
    }
    match value {
        Value::Array(items) => Value::Array(
            items.iter().map(|item| sanitize_at(item, depth + 1)).collect(),
        ),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, item)| (key.clone(), sanitize_at(item, depth + 1)))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

/// Sanitize an optional context value into the mapping stored on an entry.
///
/// `None` becomes an empty mapping; a non-object value is wrapped under a
/// `"value"` key so stored context is always a mapping.
#[must_use]
pub fn sanitize_context(context: Option<Value>) -> Map<String, Value> {
    match context {
        None => Map::new(),
        Some(Value::Object(fields)) => fields
            .iter()
            .map(|(key, item)| (key.clone(), sanitize_at(item, 1)))
            .collect(),
        Some(other) => {
            let mut wrapped = Map::new();
            wrapped.insert("value".to_string(), sanitize_value(&other));
            wrapped
        }
    }
}

/// Convert any serializable value into sanitized JSON.
///
/// When conversion fails (out-of-range 128-bit integers, a `Serialize`
/// impl that refuses) the value is coerced to a descriptive string
/// instead of propagating the error.
#[must_use]
pub fn sanitize_serializable<T: Serialize>(value: &T) -> Value {
    match serde_json::to_value(value) {
        Ok(converted) => sanitize_value(&converted),
        Err(err) => Value::String(format!(
            "[unserializable {}: {err}]",
            std::any::type_name::<T>()
        )),
    }
}

/// Render a 128-bit integer as a decimal string.
///
/// JSON numbers top out at 64 bits; wider integers travel as strings.
#[must_use]
pub fn big_int(value: i128) -> Value {
    Value::String(value.to_string())
}

/// Render a timestamp as an RFC 3339 / ISO 8601 string.
#[must_use]
pub fn timestamp(value: DateTime<Utc>) -> Value {
    Value::String(value.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested(levels: usize) -> Value {
        let mut value = json!("leaf");
        for _ in 0..levels {
            value = json!({ "inner": value });
        }
        value
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(sanitize_value(&json!("text")), json!("text"));
        assert_eq!(sanitize_value(&json!(42)), json!(42));
        assert_eq!(sanitize_value(&json!(true)), json!(true));
        assert_eq!(sanitize_value(&Value::Null), Value::Null);
    }

    #[test]
    fn nested_structures_survive_below_limit() {
        let value = nested(MAX_DEPTH - 1);
        assert_eq!(sanitize_value(&value), value);
    }

    #[test]
    fn deep_nesting_collapses_to_marker() {
        let value = nested(MAX_DEPTH + 4);
        let sanitized = sanitize_value(&value);

        let mut cursor = &sanitized;
        while let Some(inner) = cursor.get("inner") {
            cursor = inner;
        }
        assert_eq!(cursor, &json!(CIRCULAR_MARKER));
    }

    #[test]
    fn non_object_context_is_wrapped() {
        let context = sanitize_context(Some(json!([1, 2, 3])));
        assert_eq!(context.get("value"), Some(&json!([1, 2, 3])));
    }

    #[test]
    fn missing_context_is_empty_mapping() {
        assert!(sanitize_context(None).is_empty());
    }

    #[test]
    fn out_of_range_integers_coerce_to_string() {
        let sanitized = sanitize_serializable(&i128::MAX);
        let text = sanitized.as_str().expect("coerced to string");
        assert!(text.starts_with("[unserializable"));
    }

    #[test]
    fn refusing_serialize_impls_coerce_to_string() {
        struct Callable;

        impl Serialize for Callable {
            fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                Err(serde::ser::Error::custom("cannot serialize a callable"))
            }
        }

        let sanitized = sanitize_serializable(&Callable);
        let text = sanitized.as_str().expect("coerced to string");
        assert!(text.contains("cannot serialize a callable"));
    }

    #[test]
    fn big_int_renders_decimal_string() {
        let value = 170_141_183_460_469_231_731_687_303_715_884_105_727_i128;
        assert_eq!(
            big_int(value),
            json!("170141183460469231731687303715884105727")
        );
    }

    #[test]
    fn timestamp_renders_iso8601() {
        let moment = DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);
        assert_eq!(timestamp(moment), json!("2025-06-01T12:00:00+00:00"));
    }
}
