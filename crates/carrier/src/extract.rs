use serde_yaml::Value;

/// Walk a dotted field path (`meta.feature`) through nested mappings.
pub fn value_at_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current
            .as_mapping()?
            .get(&Value::String(segment.to_string()))?;
    }
    Some(current)
}

/// Dotted-path lookup returning trimmed non-empty strings only.
/// Non-string terminal values are ignored, not coerced.
pub fn extract_str_path(value: &Value, path: &str) -> Option<String> {
    let found = value_at_path(value, path)?.as_str()?.trim();
    if found.is_empty() {
        None
    } else {
        Some(found.to_string())
    }
}

/// Extract a feature identifier: the schema's dotted identifier field
/// first, then each top-level fallback field in order. First non-empty
/// string wins.
pub fn extract_feature_id(
    value: Option<&Value>,
    identifier_field: &str,
    fallback_fields: &[String],
) -> Option<String> {
    let value = value?;
    if let Some(id) = extract_str_path(value, identifier_field) {
        return Some(id);
    }
    fallback_fields
        .iter()
        .find_map(|field| extract_str_path(value, field))
}

/// Read a string off a top-level key, falling back to the same key under
/// `meta`. Used for free-form metadata such as `status` and `version`.
pub fn extract_str(value: Option<&Value>, key: &str) -> Option<String> {
    let value = value?;
    extract_str_path(value, key).or_else(|| extract_str_path(value, &format!("meta.{key}")))
}

/// Read a bool off a top-level key, falling back to the same key under
/// `meta`. Used for the explicit `primary` declaration.
pub fn extract_bool(value: Option<&Value>, key: &str) -> Option<bool> {
    let value = value?;
    let lookup = |path: &str| value_at_path(value, path).and_then(Value::as_bool);
    lookup(key).or_else(|| lookup(&format!("meta.{key}")))
}
