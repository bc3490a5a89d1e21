//! Typed readers over loosely-shaped JSON values.
//!
//! Override patches arrive as raw `serde_json::Value` objects from editors
//! and persisted bindings. These helpers extract exactly one well-typed
//! field and return `None` for anything mistyped or absent, which is how
//! the override whitelist drops bad data silently instead of erroring.

use serde_json::Value;

/// Read a boolean field from a JSON object. Non-boolean values read as `None`.
#[must_use]
pub fn object_bool(value: &Value, key: &str) -> Option<bool> {
    value.as_object()?.get(key)?.as_bool()
}

/// Read a string field from a JSON object. Non-string values read as `None`.
#[must_use]
pub fn object_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.as_object()?.get(key)?.as_str()
}

/// Whether the value is a JSON object (the only shape overrides accept).
#[must_use]
pub fn is_object(value: &Value) -> bool {
    value.is_object()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_typed_fields() {
        let v = json!({"showTitle": false, "label": "go"});
        assert_eq!(object_bool(&v, "showTitle"), Some(false));
        assert_eq!(object_str(&v, "label"), Some("go"));
    }

    #[test]
    fn mistyped_fields_read_as_none() {
        let v = json!({"showTitle": "yes", "label": 3});
        assert_eq!(object_bool(&v, "showTitle"), None);
        assert_eq!(object_str(&v, "label"), None);
    }

    #[test]
    fn non_objects_read_as_none() {
        assert_eq!(object_bool(&json!([1, 2]), "showTitle"), None);
        assert_eq!(object_str(&json!("text"), "label"), None);
    }
}
