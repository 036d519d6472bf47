use proptest::prelude::*;
use quill_trace::sanitize::{sanitize_context, sanitize_value, CIRCULAR_MARKER, MAX_DEPTH};
use serde_json::{json, Value};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<f64>().prop_filter("finite", |f| f.is_finite()).prop_map(Value::from),
        "[a-zA-Z0-9 _-]{0,24}".prop_map(Value::from),
    ];
    leaf.prop_recursive(6, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::hash_map("[a-z]{1,8}", inner, 0..6).prop_map(|fields| {
                Value::Object(fields.into_iter().collect())
            }),
        ]
    })
}

proptest! {
    // Sanitization must never panic and must always produce a value that
    // round-trips through the serializer.
    #[test]
    fn prop_sanitize_never_fails(value in arb_json()) {
        let sanitized = sanitize_value(&value);
        let serialized = serde_json::to_string(&sanitized);
        prop_assert!(serialized.is_ok());
    }

    // Values within the depth limit pass through untouched.
    #[test]
    fn prop_shallow_values_unchanged(value in arb_json()) {
        prop_assert_eq!(sanitize_value(&value), value);
    }

    // Stored context is always a mapping, whatever the caller supplied.
    #[test]
    fn prop_context_is_always_a_mapping(value in arb_json()) {
        let context = sanitize_context(Some(value));
        let serialized = serde_json::to_string(&context);
        prop_assert!(serialized.is_ok());
    }
}

#[test]
fn pathological_depth_is_bounded() {
    let mut value = json!(0);
    for _ in 0..(MAX_DEPTH * 8) {
        value = json!([value]);
    }

    let sanitized = sanitize_value(&value);
    let rendered = serde_json::to_string(&sanitized).expect("serializable");
    assert!(rendered.contains(CIRCULAR_MARKER));
}
