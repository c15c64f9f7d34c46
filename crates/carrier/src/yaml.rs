use crate::error::{CarrierError, Result};
use crate::{ParsedDocument, SCHEMA_TAG_KEY};
use serde_yaml::Value;

/// Parse a whole YAML document.
///
/// Empty or whitespace-only input is a valid "no content" document.
/// Non-mapping roots (scalars, sequences) are accepted as carrying no
/// schema tag; only actual syntax errors fail.
pub fn parse_yaml(text: &str) -> Result<ParsedDocument> {
    if text.trim().is_empty() {
        return Ok(ParsedDocument::empty());
    }

    let value: Value =
        serde_yaml::from_str(text).map_err(|err| CarrierError::from_yaml(&err))?;

    let schema_tag = schema_tag_of(&value);
    Ok(ParsedDocument {
        value: Some(value),
        schema_tag,
        body: None,
    })
}

/// Read the reserved `schema` key off a mapping root.
pub(crate) fn schema_tag_of(value: &Value) -> Option<String> {
    let mapping = value.as_mapping()?;
    let tag = mapping.get(&Value::String(SCHEMA_TAG_KEY.to_string()))?;
    let tag = tag.as_str()?.trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_string())
    }
}
