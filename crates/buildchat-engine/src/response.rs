//! Turning task endpoint responses into display text.

use serde_json::Value;

/// Extract the text to show for a successful endpoint response.
///
/// Precedence:
/// 1. `result.output`, when it is a non-empty string
/// 2. `result`, as-is when a string, otherwise pretty-printed JSON
/// 3. the whole body, pretty-printed
///
/// A candidate that is `null`, `false`, `0` or `""` counts as absent and
/// falls through to the next one.
pub fn extract_display_text(body: &Value) -> String {
    let result = body.get("result").filter(|r| is_truthy(r));

    if let Some(Value::String(output)) = result.and_then(|r| r.get("output")) {
        if !output.is_empty() {
            return output.clone();
        }
    }

    match result {
        Some(Value::String(text)) => text.clone(),
        Some(other) => pretty(other),
        None => pretty(body),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn pretty(value: &Value) -> String {
    // Serializing a `Value` cannot fail: keys are always strings.
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
