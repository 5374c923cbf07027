use serde_json::Value;

use super::schema::SchemaVersion;

/// Whether `raw` is worth handing to the compatibility gate at all.
///
/// Accepts when any registered schema generation accepts, which today
/// reduces to "an object with a string `title`". A `true` result does not
/// mean the document is complete; the gate still normalizes it.
pub fn validate_process_json(raw: &Value) -> bool {
    SchemaVersion::ALL.iter().any(|v| v.accepts(raw))
}

/// The generations whose acceptance rule `raw` satisfies, oldest first.
pub fn accepting_versions(raw: &Value) -> Vec<SchemaVersion> {
    SchemaVersion::ALL
        .into_iter()
        .filter(|v| v.accepts(raw))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_only_is_valid() {
        assert!(validate_process_json(&json!({"title": "x"})));
    }

    #[test]
    fn test_empty_object_is_invalid() {
        assert!(!validate_process_json(&json!({})));
    }

    #[test]
    fn test_null_is_invalid() {
        assert!(!validate_process_json(&Value::Null));
    }

    #[test]
    fn test_non_string_title_is_invalid() {
        assert!(!validate_process_json(&json!({"title": 12, "steps": []})));
        assert!(!validate_process_json(&json!("title")));
        assert!(!validate_process_json(&json!([{"title": "x"}])));
    }

    #[test]
    fn test_accepting_versions() {
        assert_eq!(
            accepting_versions(&json!({"title": "P", "steps": []})),
            vec![SchemaVersion::V1, SchemaVersion::V2, SchemaVersion::V3]
        );
        assert_eq!(
            accepting_versions(&json!({"title": "P", "flows": []})),
            vec![SchemaVersion::V3]
        );
        assert!(accepting_versions(&json!({})).is_empty());
    }
}
