use crate::types::{FeatureScanResult, ScanResult};
use scout_schema::SchemaRegistry;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Validation knobs for one logical file-type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileTypeRule {
    /// Absence is always an error.
    pub required: bool,

    /// Absence is a warning once the feature's phase reaches this value.
    pub required_from_phase: Option<u32>,

    /// Warn when a feature carries more instances than this.
    pub max_instances: Option<usize>,
}

/// Per-file-type expectations a feature is validated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub rules: BTreeMap<String, FileTypeRule>,
}

impl Default for FeatureSpec {
    fn default() -> Self {
        let mut rules = BTreeMap::new();
        rules.insert(
            "progress-log".to_string(),
            FileTypeRule {
                required: true,
                required_from_phase: None,
                max_instances: Some(1),
            },
        );
        rules.insert(
            "design".to_string(),
            FileTypeRule {
                required: false,
                required_from_phase: Some(2),
                max_instances: None,
            },
        );
        rules.insert(
            "test-plan".to_string(),
            FileTypeRule {
                required: false,
                required_from_phase: Some(3),
                max_instances: None,
            },
        );
        Self { rules }
    }
}

impl FeatureSpec {
    /// Derive a spec from a registry: every feature-scoped definition gets
    /// a rule, required per its flag, merged over the built-in defaults.
    pub fn from_registry(registry: &SchemaRegistry) -> Self {
        let mut spec = Self::default();
        for def in registry.by_scope(scout_schema::SchemaScope::Feature) {
            let entry = spec.rules.entry(def.file_type().to_string()).or_default();
            entry.required = entry.required || def.required;
        }
        spec
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Aggregated health, ordered so `max` picks the worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Valid,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Machine code, e.g. `missing_required_file`.
    pub code: String,
    pub message: String,
    /// Offending file path when one exists.
    pub file: Option<String>,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureValidationReport {
    pub feature: String,
    pub status: ValidationStatus,
    pub issues: Vec<ValidationIssue>,
    /// File types required by the spec but absent from the primary mapping.
    pub missing_required: Vec<String>,
    /// File types absent although the feature's phase requires them.
    pub missing_for_phase: Vec<String>,
    /// Free-text warnings (instance overflow, implicit primary, ...).
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Worst status across features, at least `warning` when unknown-schema
    /// files exist anywhere in the project.
    pub status: ValidationStatus,
    pub features: BTreeMap<String, FeatureValidationReport>,
    pub project_issues: Vec<ValidationIssue>,
}

/// Completeness checker over a scan result. Consumes the scanner's output
/// shape only and never fails; every finding is a reported value.
#[derive(Debug, Clone)]
pub struct Validator {
    registry: SchemaRegistry,
}

impl Validator {
    pub fn new(registry: SchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn validate(&self, scan: &ScanResult, spec: &FeatureSpec) -> ValidationReport {
        let mut features = BTreeMap::new();
        let mut overall = ValidationStatus::Valid;

        for (name, feature) in &scan.features {
            let report = self.validate_feature(feature, spec);
            overall = overall.max(report.status);
            features.insert(name.clone(), report);
        }

        let mut project_issues = Vec::new();
        if !scan.unknown_schemas.is_empty() {
            overall = overall.max(ValidationStatus::Warning);
            project_issues.push(ValidationIssue {
                severity: Severity::Warning,
                code: "unknown_schemas".to_string(),
                message: format!(
                    "{} file(s) carry a schema tag that could not be classified",
                    scan.unknown_schemas.len()
                ),
                file: None,
                suggestion: Some(
                    "inspect the unknown-schema list and register or correct the tags"
                        .to_string(),
                ),
            });
        }

        ValidationReport {
            status: overall,
            features,
            project_issues,
        }
    }

    fn validate_feature(
        &self,
        feature: &FeatureScanResult,
        spec: &FeatureSpec,
    ) -> FeatureValidationReport {
        let mut issues = Vec::new();
        let mut missing_required = Vec::new();
        let mut missing_for_phase = Vec::new();
        let mut warnings = Vec::new();

        let phase = current_phase(feature);

        for (file_type, rule) in &spec.rules {
            let has_primary = feature.primary_files.contains_key(file_type);
            let instance_count = feature
                .all_files
                .get(file_type)
                .map(Vec::len)
                .unwrap_or(0);

            if rule.required && !has_primary {
                missing_required.push(file_type.clone());
                issues.push(ValidationIssue {
                    severity: Severity::Error,
                    code: "missing_required_file".to_string(),
                    message: format!(
                        "feature '{}' has no {file_type} file",
                        feature.feature
                    ),
                    file: None,
                    suggestion: self.creation_hint(file_type),
                });
            }

            if let Some(threshold) = rule.required_from_phase {
                if !has_primary && !rule.required {
                    match phase {
                        Some(phase) if phase >= threshold => {
                            missing_for_phase.push(file_type.clone());
                            issues.push(ValidationIssue {
                                severity: Severity::Warning,
                                code: "missing_phase_file".to_string(),
                                message: format!(
                                    "feature '{}' is at phase {phase} but has no {file_type} file (expected from phase {threshold})",
                                    feature.feature
                                ),
                                file: None,
                                suggestion: self.creation_hint(file_type),
                            });
                        }
                        Some(_) => {}
                        None => {
                            issues.push(ValidationIssue {
                                severity: Severity::Info,
                                code: "phase_unknown".to_string(),
                                message: format!(
                                    "feature '{}' has no readable phase; {file_type} requirement not evaluated",
                                    feature.feature
                                ),
                                file: None,
                                suggestion: None,
                            });
                        }
                    }
                }
            }

            if let Some(max) = rule.max_instances {
                if instance_count > max {
                    let text = format!(
                        "feature '{}' has {instance_count} {file_type} instance(s), more than the expected {max}",
                        feature.feature
                    );
                    warnings.push(text.clone());
                    issues.push(ValidationIssue {
                        severity: Severity::Warning,
                        code: "instance_overflow".to_string(),
                        message: text,
                        file: None,
                        suggestion: Some(
                            "archive or delete the extra instances, or mark one as primary"
                                .to_string(),
                        ),
                    });
                }
            }
        }

        // A conflict resolved without any explicit primary declaration is
        // only an implicit choice; surface it independently of counts.
        for conflict in &feature.conflicts {
            if !conflict.has_explicit_primary {
                let text = format!(
                    "multiple {} instances with no explicit primary; '{}' was chosen implicitly",
                    conflict.file_type, conflict.selected_path
                );
                warnings.push(text.clone());
                issues.push(ValidationIssue {
                    severity: Severity::Warning,
                    code: "implicit_primary".to_string(),
                    message: text,
                    file: Some(conflict.selected_path.clone()),
                    suggestion: Some(
                        "add `primary: true` to the authoritative instance".to_string(),
                    ),
                });
            }
        }

        let status = if !missing_required.is_empty() {
            ValidationStatus::Error
        } else if issues.iter().any(|i| i.severity == Severity::Warning) {
            ValidationStatus::Warning
        } else {
            ValidationStatus::Valid
        };

        FeatureValidationReport {
            feature: feature.feature.clone(),
            status,
            issues,
            missing_required,
            missing_for_phase,
            warnings,
        }
    }

    fn creation_hint(&self, file_type: &str) -> Option<String> {
        self.registry
            .all()
            .into_iter()
            .find(|def| def.file_type() == file_type)
            .map(|def| format!("create one ({})", def.description))
    }
}

/// Read the feature's current phase off its phase-status primary, falling
/// back to the progress-log primary.
fn current_phase(feature: &FeatureScanResult) -> Option<u32> {
    for file_type in ["phase-status", "progress-log"] {
        let Some(file) = feature.primary_files.get(file_type) else {
            continue;
        };
        let Some(content) = file.content.as_ref() else {
            continue;
        };
        for key in ["phase", "current_phase"] {
            if let Some(value) = scout_carrier::value_at_path(content, key) {
                if let Some(phase) = phase_from_value(value) {
                    return Some(phase);
                }
            }
        }
    }
    None
}

/// Accept numeric phases and the conventional phase names.
fn phase_from_value(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    let name = value.as_str()?.trim().to_lowercase();
    if let Ok(n) = name.parse::<u32>() {
        return Some(n);
    }
    match name.as_str() {
        "planning" => Some(1),
        "design" => Some(2),
        "implementation" => Some(3),
        "testing" => Some(4),
        "done" => Some(5),
        _ => None,
    }
}
