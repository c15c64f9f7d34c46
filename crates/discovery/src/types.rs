use crate::resolver::ConflictReport;
use crate::stats::ScanStats;
use scout_schema::CarrierKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One classified artifact file. Created fresh on every scan and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredFile {
    /// Path relative to the project root, forward slashes.
    pub path: String,

    /// Schema identifier as resolved (declared tag, or the legacy rule's
    /// target). May carry a version suffix.
    pub schema_id: String,

    /// Content format the file was parsed as.
    pub carrier: CarrierKind,

    /// Parsed content, opaque to the engine beyond metadata extraction.
    pub content: Option<serde_yaml::Value>,

    /// Last-modified time, milliseconds since the Unix epoch.
    pub modified_ms: u64,

    /// Size in bytes.
    pub size: u64,

    /// True when classified by filename convention instead of an explicit tag.
    pub legacy: bool,

    /// Explicit author intent: this instance declares itself primary.
    pub is_primary: Option<bool>,

    /// Free-form lifecycle tag (active/archived/backup/deprecated/...).
    pub status: Option<String>,

    /// Declared content version string.
    pub version: Option<String>,

    /// Inferred owning feature, absent for project-scoped files.
    pub feature: Option<String>,
}

impl DiscoveredFile {
    /// Logical file-type: trailing path segment of the schema identifier
    /// (`ai-coding/design@1.0` → `design`).
    pub fn file_type(&self) -> String {
        let base = scout_schema::base_id(&self.schema_id);
        base.rsplit('/').next().unwrap_or(base).to_string()
    }

    /// Number of path segments, used by the shallowest-path tie-break.
    pub fn path_depth(&self) -> usize {
        self.path.split('/').filter(|s| !s.is_empty()).count()
    }
}

/// Why a tagged file could not be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownSchemaCategory {
    /// The declared tag fails the identifier grammar, or names a schema
    /// that cannot be carried in this file's format.
    Invalid,
    /// Well-formed tag with no registry entry.
    Unknown,
    /// The tag failed, but the filename matches a legacy rule the file
    /// could fall back to if the tag were removed.
    LegacyEligible,
}

impl UnknownSchemaCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            UnknownSchemaCategory::Invalid => "invalid",
            UnknownSchemaCategory::Unknown => "unknown",
            UnknownSchemaCategory::LegacyEligible => "legacy",
        }
    }
}

/// A file whose schema tag failed format validation or registry lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownSchemaItem {
    /// The file, with `schema_id` holding the declared tag verbatim.
    pub file: DiscoveredFile,
    pub category: UnknownSchemaCategory,
    /// Suggested remediation.
    pub suggestion: String,
}

/// Everything discovered for one feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureScanResult {
    pub feature: String,

    /// File-type → resolved primary instance. Present only when resolution
    /// succeeded; always a subset of `all_files`.
    pub primary_files: BTreeMap<String, DiscoveredFile>,

    /// File-type → every candidate instance, sorted by path.
    pub all_files: BTreeMap<String, Vec<DiscoveredFile>>,

    /// One report per file-type group that had more than one candidate.
    pub conflicts: Vec<ConflictReport>,

    /// Shallowest common path prefix of the feature's files. Advisory.
    pub base_dir: Option<String>,
}

/// Output of one scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    /// Feature identifier → per-feature result.
    pub features: BTreeMap<String, FeatureScanResult>,

    /// Project-scoped files, excluded from feature grouping.
    pub project_files: Vec<DiscoveredFile>,

    /// Files whose declared schema tag could not be classified.
    pub unknown_schemas: Vec<UnknownSchemaItem>,

    /// Non-fatal notes surfaced to the caller (e.g. missing config file).
    pub warnings: Vec<String>,

    pub stats: ScanStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_file(path: &str, schema_id: &str) -> DiscoveredFile {
        DiscoveredFile {
            path: path.to_string(),
            schema_id: schema_id.to_string(),
            carrier: CarrierKind::Yaml,
            content: None,
            modified_ms: 0,
            size: 0,
            legacy: false,
            is_primary: None,
            status: None,
            version: None,
            feature: None,
        }
    }

    #[test]
    fn file_type_strips_namespace_and_version() {
        let file = sample_file("docs/foo/design.yaml", "ai-coding/design@1.0");
        assert_eq!(file.file_type(), "design");
        let file = sample_file("docs/foo/design.yaml", "ai-coding/design");
        assert_eq!(file.file_type(), "design");
    }

    #[test]
    fn path_depth_counts_segments() {
        let file = sample_file("docs/foo/90_PROGRESS_LOG.yaml", "ai-coding/progress-log");
        assert_eq!(file.path_depth(), 3);
    }
}
