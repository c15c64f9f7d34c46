use crate::resolver::ConflictReport;
use crate::types::DiscoveredFile;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Projection of a discovered file for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DiscoveredFileInfo {
    pub file_type: String,
    pub path: String,
    /// Humanized name derived from the file stem.
    pub display_name: String,
    pub schema_id: String,
    pub legacy: bool,
}

impl From<&DiscoveredFile> for DiscoveredFileInfo {
    fn from(file: &DiscoveredFile) -> Self {
        Self {
            file_type: file.file_type(),
            path: file.path.clone(),
            display_name: display_name(&file.path),
            schema_id: file.schema_id.clone(),
            legacy: file.legacy,
        }
    }
}

/// Conflict report shaped for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConflictReportUi {
    pub file_type: String,
    pub instance_paths: Vec<String>,
    pub selected_path: String,
    pub reason: String,
    pub has_explicit_primary: bool,
}

impl From<&ConflictReport> for ConflictReportUi {
    fn from(report: &ConflictReport) -> Self {
        Self {
            file_type: report.file_type.clone(),
            instance_paths: report.instance_paths.clone(),
            selected_path: report.selected_path.clone(),
            reason: report.reason.clone(),
            has_explicit_primary: report.has_explicit_primary,
        }
    }
}

/// `docs/foo/90_PROGRESS_LOG.yaml` → `Progress Log`: strip the directory,
/// extension, and any numeric ordering prefix, then title-case the words.
pub fn display_name(path: &str) -> String {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let stem = file_name.split('.').next().unwrap_or(file_name);
    let stem = stem
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start_matches(['_', '-']);

    let words: Vec<String> = stem
        .split(['_', '-'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    words.join(" ")
}
