//! Lookup and rendering helpers over free-form JSON request fields.

use serde_json::Value;

/// A user profile or parameter map as sent by the client.
pub type Fields = serde_json::Map<String, Value>;

/// First non-null value for `key`: the user context wins over parameters.
pub fn lookup<'a>(ctx: &'a Fields, params: &'a Fields, key: &str) -> Option<&'a Value> {
    present(ctx, key).or_else(|| present(params, key))
}

/// Non-null value for `key` in a single map.
pub fn present<'a>(fields: &'a Fields, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|v| !v.is_null())
}

/// Render a value for inclusion in prompt text. Strings are unquoted.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".into(),
        other => other.to_string(),
    }
}

/// Rendered value for `key`, or `default` when absent.
pub fn text_or(ctx: &Fields, params: &Fields, key: &str, default: &str) -> String {
    lookup(ctx, params, key).map_or_else(|| default.to_string(), render)
}

/// Rendered parameter value for `key`, or `default` when absent.
pub fn param_or(params: &Fields, key: &str, default: &str) -> String {
    present(params, key).map_or_else(|| default.to_string(), render)
}

/// Numeric view of a value. Numeric strings are accepted.
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Empty strings, empty collections, zero, false and null are "falsy".
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// A list value as rendered items; a scalar becomes a one-item list.
pub fn as_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(render).collect(),
        other => vec![render(other)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> Fields {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_context_wins_over_params() {
        let ctx = map(json!({"age": 41, "weight": null}));
        let params = map(json!({"age": 20, "weight": 80}));
        assert_eq!(text_or(&ctx, &params, "age", "30"), "41");
        assert_eq!(text_or(&ctx, &params, "weight", "70"), "80");
        assert_eq!(text_or(&ctx, &params, "height", "170"), "170");
    }

    #[test]
    fn test_number_accepts_numeric_strings() {
        assert_eq!(number(&json!("72.5")), Some(72.5));
        assert_eq!(number(&json!(70)), Some(70.0));
        assert_eq!(number(&json!("heavy")), None);
    }

    #[test]
    fn test_as_list_and_truthy() {
        assert_eq!(as_list(&json!(["a", "b"])), vec!["a", "b"]);
        assert_eq!(as_list(&json!("solo")), vec!["solo"]);
        assert!(!truthy(&json!([])));
        assert!(!truthy(&json!("")));
        assert!(truthy(&json!(["nuts"])));
    }
}
