//! Detail rendering for users and repositories.

use serde_json::{Map, Value};

/// Fields hidden from user details, since the list header shows them.
pub const USER_HEADER_FIELDS: &[&str] = &["first_name", "last_name"];

/// Fields hidden from repository details.
pub const REPOSITORY_HEADER_FIELDS: &[&str] = &["title"];

/// Render every field not in `excluded` as `"key : value\n"`, in map order.
pub fn format_fields(record: &Map<String, Value>, excluded: &[&str]) -> String {
    record
        .iter()
        .filter(|(key, _)| !excluded.contains(&key.as_str()))
        .map(|(key, value)| format!("{} : {}\n", key, display_value(value)))
        .collect()
}

/// Plain-text form of a field value: strings unquoted, booleans as
/// `True`/`False`, null as `None`.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => crate::permissions::flag(*b).to_string(),
        Value::Null => "None".to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_format_fields_excludes_keys() {
        let user = record(json!({
            "id": 1,
            "login": "jdoe",
            "first_name": "John",
            "last_name": "Doe",
            "admin": true,
            "timezone": null
        }));

        assert_eq!(
            format_fields(&user, USER_HEADER_FIELDS),
            "id : 1\nlogin : jdoe\nadmin : True\ntimezone : None\n"
        );
    }

    #[test]
    fn test_format_fields_repository() {
        let repo = record(json!({"id": 10, "name": "core", "title": "Core", "vcs": "git"}));
        assert_eq!(
            format_fields(&repo, REPOSITORY_HEADER_FIELDS),
            "id : 10\nname : core\nvcs : git\n"
        );
    }

    #[test]
    fn test_format_fields_nothing_left() {
        let repo = record(json!({"title": "Core"}));
        assert_eq!(format_fields(&repo, REPOSITORY_HEADER_FIELDS), "");
    }

    #[test]
    fn test_display_nested_values() {
        assert_eq!(display_value(&json!(["a", "b"])), r#"["a","b"]"#);
        assert_eq!(display_value(&json!(2.5)), "2.5");
        assert_eq!(display_value(&json!(false)), "False");
    }
}
