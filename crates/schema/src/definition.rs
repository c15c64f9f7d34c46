use serde::{Deserialize, Serialize};

/// Content format a file uses to carry schema-tagged data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CarrierKind {
    /// Plain YAML document; the schema tag is a reserved root key.
    Yaml,
    /// Markdown file with a leading `---` fenced YAML header.
    MarkdownWithHeader,
}

impl CarrierKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            CarrierKind::Yaml => "yaml",
            CarrierKind::MarkdownWithHeader => "markdown-with-header",
        }
    }

    /// Map a file extension (without dot, lowercase) to its carrier.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "yaml" | "yml" => Some(CarrierKind::Yaml),
            "md" | "markdown" => Some(CarrierKind::MarkdownWithHeader),
            _ => None,
        }
    }
}

/// Whether a schema describes a per-feature artifact or a project-wide one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaScope {
    Feature,
    Project,
}

/// Metadata the registry holds for one known schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Base identifier (`namespace/name`, no version suffix).
    pub id: String,

    /// `major.minor` version this definition describes, if versioned.
    pub version: Option<String>,

    /// Human description of the schema's role.
    pub description: String,

    /// Grouping scope for discovered files.
    pub scope: SchemaScope,

    /// Whether every feature is expected to carry this file type.
    pub required: bool,

    /// Dotted path to the feature identifier inside parsed content
    /// (e.g. `meta.feature`).
    pub identifier_field: String,

    /// Ordered top-level field names consulted when the identifier field
    /// yields nothing. First non-empty string wins.
    #[serde(default)]
    pub fallback_fields: Vec<String>,

    /// Content formats this schema may be carried in.
    pub carriers: Vec<CarrierKind>,
}

impl SchemaDefinition {
    /// Trailing segment of the identifier, the logical file-type used for
    /// grouping (`ai-coding/design` → `design`).
    pub fn file_type(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }

    pub fn supports_carrier(&self, carrier: CarrierKind) -> bool {
        self.carriers.contains(&carrier)
    }
}
