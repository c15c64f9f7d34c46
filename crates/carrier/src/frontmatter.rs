use crate::error::{CarrierError, Result};
use crate::yaml::schema_tag_of;
use crate::ParsedDocument;
use serde_yaml::Value;

const FENCE: &str = "---";

/// Parse a Markdown file with an optional leading `---` fenced YAML header.
///
/// No opening fence on the very first line means "no header, whole content
/// is body". An opening fence without a matching closing fence is also
/// treated as "no header" so partially-written files never fail. Only
/// malformed YAML inside a complete header is an error.
pub fn parse_frontmatter(text: &str) -> Result<ParsedDocument> {
    let Some((header, body)) = split_header(text) else {
        return Ok(ParsedDocument {
            value: None,
            schema_tag: None,
            body: Some(text.to_string()),
        });
    };

    if header.trim().is_empty() {
        return Ok(ParsedDocument {
            value: None,
            schema_tag: None,
            body: Some(body.to_string()),
        });
    }

    let value: Value =
        serde_yaml::from_str(header).map_err(|err| CarrierError::from_yaml(&err))?;
    let schema_tag = schema_tag_of(&value);
    Ok(ParsedDocument {
        value: Some(value),
        schema_tag,
        body: Some(body.to_string()),
    })
}

/// Split `text` into (header, body) when a complete fenced block starts at
/// the first line. Returns `None` when there is no opening fence or no
/// closing fence.
fn split_header(text: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    let mut lines = text.split_inclusive('\n');

    let first = lines.next()?;
    if first.trim_end() != FENCE {
        return None;
    }
    offset += first.len();
    let header_start = offset;

    for line in lines {
        if line.trim_end() == FENCE {
            let header = &text[header_start..offset];
            let body = &text[offset + line.len()..];
            return Some((header, body));
        }
        offset += line.len();
    }

    None
}
