use once_cell::sync::Lazy;
use regex::Regex;

/// Lexical grammar for schema identifiers:
/// `lowercase-namespace/lowercase-name[@major.minor]`.
///
/// Namespace and name are lowercase alphanumeric words joined by single
/// hyphens; the optional version suffix is two dot-separated numbers.
static SCHEMA_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*/[a-z0-9]+(?:-[a-z0-9]+)*(?:@\d+\.\d+)?$")
        .expect("schema id grammar is a valid regex")
});

/// Components of a well-formed schema identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSchemaId {
    pub namespace: String,
    pub name: String,
    /// `major.minor` suffix when present.
    pub version: Option<String>,
}

impl ParsedSchemaId {
    /// Identifier without the version suffix (`namespace/name`).
    pub fn base(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// Trailing path segment of the identifier, used as the logical
    /// file-type when grouping discovered files (`ai-coding/design` →
    /// `design`).
    pub fn file_type(&self) -> &str {
        &self.name
    }
}

/// Check an identifier against the lexical grammar. Malformed identifiers
/// must be rejected before any registry lookup is attempted.
pub fn validate_format(id: &str) -> bool {
    SCHEMA_ID_RE.is_match(id)
}

/// Parse an identifier into its components, or `None` if malformed.
pub fn parse_id(id: &str) -> Option<ParsedSchemaId> {
    if !validate_format(id) {
        return None;
    }
    let (base, version) = match id.split_once('@') {
        Some((base, version)) => (base, Some(version.to_string())),
        None => (id, None),
    };
    let (namespace, name) = base.split_once('/')?;
    Some(ParsedSchemaId {
        namespace: namespace.to_string(),
        name: name.to_string(),
        version,
    })
}

/// Strip the version suffix, accepting both versioned and unversioned
/// forms. Does not validate; lookup callers validate first.
pub fn base_id(id: &str) -> &str {
    match id.split_once('@') {
        Some((base, _)) => base,
        None => id,
    }
}
