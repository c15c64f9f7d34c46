//! # Scout Carrier
//!
//! Content parsers for the two artifact carriers:
//!
//! ```text
//! Raw text
//!     │
//!     ├──> YAML parser (whole document)
//!     │      └─> value + optional `schema:` tag
//!     │
//!     └──> Frontmatter parser (leading --- fenced header)
//!            └─> header value + optional tag + markdown body
//! ```
//!
//! Both parsers share one contract: success carries an optional structured
//! value (absent for empty input) and the extracted schema tag when the
//! reserved `schema` key is present. Missing or unterminated headers are
//! "no header", never errors; only syntax errors inside present YAML fail.

mod error;
mod extract;
mod frontmatter;
mod yaml;

pub use error::{CarrierError, Result};
pub use extract::{extract_bool, extract_feature_id, extract_str, extract_str_path, value_at_path};
pub use frontmatter::parse_frontmatter;
pub use yaml::parse_yaml;

use scout_schema::CarrierKind;

/// Reserved top-level key carrying the self-declared schema tag.
pub const SCHEMA_TAG_KEY: &str = "schema";

/// Outcome of parsing one file's content.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    /// Structured value: the YAML document root, or the frontmatter
    /// header. `None` for empty/whitespace-only input or absent headers.
    pub value: Option<serde_yaml::Value>,

    /// Self-declared schema tag, when the reserved key is present.
    pub schema_tag: Option<String>,

    /// Markdown body following the header (frontmatter carrier only).
    pub body: Option<String>,
}

impl ParsedDocument {
    pub fn empty() -> Self {
        Self {
            value: None,
            schema_tag: None,
            body: None,
        }
    }
}

/// Dispatch to the parser for the given carrier kind.
pub fn parse(carrier: CarrierKind, text: &str) -> Result<ParsedDocument> {
    match carrier {
        CarrierKind::Yaml => parse_yaml(text),
        CarrierKind::MarkdownWithHeader => parse_frontmatter(text),
    }
}
