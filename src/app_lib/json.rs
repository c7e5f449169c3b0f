//! Helpers for loosely-typed JSON identifiers returned by the API.

use serde_json::Value;

/// Textual form of an identifier: strings verbatim, numbers and booleans in
/// their JSON form, `null`/arrays/objects as an empty string.
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Textual form of an optional field, empty when the field is absent.
#[must_use]
pub fn field_text(value: Option<&Value>) -> String {
    value.map(value_text).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_text_keeps_strings_and_numbers() {
        assert_eq!(value_text(&json!("Staff")), "Staff");
        assert_eq!(value_text(&json!(42)), "42");
        assert_eq!(value_text(&json!(null)), "");
        assert_eq!(value_text(&json!({"id": 1})), "");
    }

    #[test]
    fn field_text_handles_missing() {
        let body = json!({"login_id": 7});
        assert_eq!(field_text(body.get("login_id")), "7");
        assert_eq!(field_text(body.get("user_type_id")), "");
    }
}
