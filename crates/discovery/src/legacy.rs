use crate::types::DiscoveredFile;
use once_cell::sync::Lazy;
use regex::Regex;
use scout_carrier::{extract_bool, extract_feature_id, extract_str, ParsedDocument};
use scout_schema::CarrierKind;

/// One filename-convention rule: a pattern on the base filename bound to
/// the schema the file predates declaring.
#[derive(Debug)]
pub struct LegacyRule {
    pub pattern: Regex,
    pub schema_id: &'static str,
    pub carrier: CarrierKind,
    pub identifier_field: &'static str,
    pub fallback_fields: &'static [&'static str],
}

const FEATURE_FALLBACKS: &[&str] = &["feature", "feature_id"];

/// Ordered rule table, first match wins. Patterns are kept mutually
/// exclusive by convention so declaration order never has to arbitrate.
static LEGACY_RULES: Lazy<Vec<LegacyRule>> = Lazy::new(|| {
    let rule = |pattern: &str,
                schema_id: &'static str,
                carrier: CarrierKind|
     -> LegacyRule {
        LegacyRule {
            pattern: Regex::new(pattern).expect("legacy rule pattern is a valid regex"),
            schema_id,
            carrier,
            identifier_field: "meta.feature",
            fallback_fields: FEATURE_FALLBACKS,
        }
    };

    vec![
        rule(
            r"^\d{2}_PROGRESS_LOG\.ya?ml$",
            "ai-coding/progress-log@1.0",
            CarrierKind::Yaml,
        ),
        rule(
            r"^\d{2}_PHASE_STATUS\.ya?ml$",
            "ai-coding/phase-status@1.0",
            CarrierKind::Yaml,
        ),
        rule(
            r"^DESIGN(_DOC)?\.md$",
            "ai-coding/design@1.0",
            CarrierKind::MarkdownWithHeader,
        ),
        rule(
            r"^REQUIREMENTS\.md$",
            "ai-coding/requirements@1.0",
            CarrierKind::MarkdownWithHeader,
        ),
        rule(
            r"^TEST_PLAN\.ya?ml$",
            "ai-coding/test-plan@1.0",
            CarrierKind::Yaml,
        ),
        rule(
            r"^TEST_PLAN\.md$",
            "ai-coding/test-plan@1.0",
            CarrierKind::MarkdownWithHeader,
        ),
        rule(
            r"^\d{2}_DECISIONS\.md$",
            "ai-coding/decision-record@1.0",
            CarrierKind::MarkdownWithHeader,
        ),
    ]
});

/// Directory names whose next path segment conventionally names the feature.
const CONTAINER_DIRS: &[&str] = &["features", ".features", "docs", "specs"];

/// Pattern-based fallback classifier for files that predate the
/// self-describing schema convention.
#[derive(Debug, Default, Clone)]
pub struct LegacyDetector;

impl LegacyDetector {
    pub fn new() -> Self {
        Self
    }

    /// Find the first rule whose pattern matches the base filename.
    pub fn matching_rule(&self, rel_path: &str) -> Option<&'static LegacyRule> {
        let file_name = rel_path.rsplit('/').next()?;
        LEGACY_RULES.iter().find(|rule| rule.pattern.is_match(file_name))
    }

    /// Classify a file by filename convention. `None` means the file
    /// matches no rule and simply carries no schema-relevant information.
    pub fn detect(
        &self,
        rel_path: &str,
        parsed: &ParsedDocument,
        modified_ms: u64,
        size: u64,
    ) -> Option<DiscoveredFile> {
        let rule = self.matching_rule(rel_path)?;

        let fallbacks: Vec<String> =
            rule.fallback_fields.iter().map(|f| f.to_string()).collect();
        let feature = extract_feature_id(
            parsed.value.as_ref(),
            rule.identifier_field,
            &fallbacks,
        )
        .or_else(|| infer_feature_from_path(rel_path));

        log::debug!(
            "legacy rule matched {rel_path} -> {} (feature: {feature:?})",
            rule.schema_id
        );

        Some(DiscoveredFile {
            path: rel_path.to_string(),
            schema_id: rule.schema_id.to_string(),
            carrier: rule.carrier,
            content: parsed.value.clone(),
            modified_ms,
            size,
            legacy: true,
            is_primary: extract_bool(parsed.value.as_ref(), "primary")
                .or_else(|| extract_bool(parsed.value.as_ref(), "is_primary")),
            status: extract_str(parsed.value.as_ref(), "status"),
            version: extract_str(parsed.value.as_ref(), "version"),
            feature,
        })
    }
}

/// Infer a feature identifier from the path: the segment immediately
/// following a conventional container directory, then the immediate parent
/// directory name, then the file stem.
pub fn infer_feature_from_path(rel_path: &str) -> Option<String> {
    let segments: Vec<&str> = rel_path.split('/').filter(|s| !s.is_empty()).collect();
    let (file_name, dirs) = segments.split_last()?;

    for (i, dir) in dirs.iter().enumerate() {
        if CONTAINER_DIRS.contains(&dir.to_lowercase().as_str()) {
            if let Some(next) = dirs.get(i + 1) {
                return Some((*next).to_string());
            }
        }
    }

    if let Some(parent) = dirs.last() {
        return Some((*parent).to_string());
    }

    // File at the project root: fall back to its stem.
    let stem = file_name.split('.').next().unwrap_or(file_name);
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}
