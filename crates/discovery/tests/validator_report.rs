use pretty_assertions::assert_eq;
use scout_discovery::{
    FeatureSpec, ProjectConfig, ProjectScanner, ValidationStatus, Validator,
};
use scout_schema::SchemaRegistry;
use std::fs;
use tempfile::tempdir;

fn scan_and_validate(root: &std::path::Path) -> scout_discovery::ValidationReport {
    let registry = SchemaRegistry::with_builtins();
    let scanner = ProjectScanner::new(registry.clone(), ProjectConfig::default()).unwrap();
    let result = scanner.scan(root).unwrap();
    Validator::new(registry).validate(&result, &FeatureSpec::default())
}

#[test]
fn feature_without_progress_log_is_an_error() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("docs").join("foo");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("DESIGN.md"),
        "---\nschema: ai-coding/design@1.0\nmeta:\n  feature: foo\n---\n# Design\n",
    )
    .unwrap();

    let report = scan_and_validate(temp.path());
    assert_eq!(report.status, ValidationStatus::Error);
    let feature = &report.features["foo"];
    assert_eq!(feature.missing_required, vec!["progress-log".to_string()]);
}

#[test]
fn early_phase_feature_is_valid_without_design() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("docs").join("foo");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("90_PROGRESS_LOG.yaml"), "feature: foo\nphase: 1\n").unwrap();

    let report = scan_and_validate(temp.path());
    assert_eq!(report.status, ValidationStatus::Valid);
    assert!(report.features["foo"].missing_for_phase.is_empty());
}

#[test]
fn late_phase_feature_without_design_warns() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("docs").join("foo");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("90_PROGRESS_LOG.yaml"), "feature: foo\nphase: 4\n").unwrap();

    let report = scan_and_validate(temp.path());
    assert_eq!(report.status, ValidationStatus::Warning);
    let feature = &report.features["foo"];
    assert!(feature
        .missing_for_phase
        .contains(&"design".to_string()));
    assert!(feature
        .missing_for_phase
        .contains(&"test-plan".to_string()));
}

#[test]
fn unknown_schema_files_downgrade_a_clean_project() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("docs").join("foo");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("90_PROGRESS_LOG.yaml"), "feature: foo\nphase: 1\n").unwrap();
    fs::write(
        temp.path().join("mystery.yaml"),
        "schema: custom/widget@1.0\n",
    )
    .unwrap();

    let report = scan_and_validate(temp.path());
    assert_eq!(report.status, ValidationStatus::Warning);
    assert!(report
        .project_issues
        .iter()
        .any(|i| i.code == "unknown_schemas"));
    assert_eq!(report.features["foo"].status, ValidationStatus::Valid);
}

#[test]
fn duplicate_progress_logs_warn_twice_over() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("docs").join("foo");
    let old = dir.join("_old");
    fs::create_dir_all(&old).unwrap();
    fs::write(dir.join("90_PROGRESS_LOG.yaml"), "feature: foo\nphase: 1\n").unwrap();
    fs::write(
        old.join("90_PROGRESS_LOG.yaml"),
        "feature: foo\nstatus: archived\n",
    )
    .unwrap();

    let report = scan_and_validate(temp.path());
    let feature = &report.features["foo"];
    assert_eq!(feature.status, ValidationStatus::Warning);
    // Both the instance cap and the implicit-primary downgrade fire.
    assert!(feature.issues.iter().any(|i| i.code == "instance_overflow"));
    assert!(feature.issues.iter().any(|i| i.code == "implicit_primary"));
}
