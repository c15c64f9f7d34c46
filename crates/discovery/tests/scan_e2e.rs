use pretty_assertions::assert_eq;
use scout_discovery::{
    ProjectConfig, ProjectScanner, ResolutionReason, UnknownSchemaCategory,
};
use scout_schema::SchemaRegistry;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tempfile::tempdir;

fn scanner() -> ProjectScanner {
    ProjectScanner::new(SchemaRegistry::with_builtins(), ProjectConfig::default()).unwrap()
}

fn set_modified(path: &Path, epoch_secs: u64) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(UNIX_EPOCH + Duration::from_secs(epoch_secs))
        .unwrap();
}

/// Scenario A: an unmarked progress log next to an archived copy resolves
/// to the unmarked one with high confidence.
#[test]
fn archived_copy_loses_to_active_instance() {
    let temp = tempdir().unwrap();
    let feature_dir = temp.path().join("docs").join("foo");
    let old_dir = feature_dir.join("_old");
    fs::create_dir_all(&old_dir).unwrap();
    fs::write(
        feature_dir.join("90_PROGRESS_LOG.yaml"),
        "feature: foo\nphase: 2\ntasks:\n  - id: 1\n    done: true\n",
    )
    .unwrap();
    fs::write(
        old_dir.join("90_PROGRESS_LOG.yaml"),
        "feature: foo\nstatus: archived\nphase: 1\n",
    )
    .unwrap();

    let result = scanner().scan(temp.path()).unwrap();
    let feature = &result.features["foo"];

    let primary = &feature.primary_files["progress-log"];
    assert_eq!(primary.path, "docs/foo/90_PROGRESS_LOG.yaml");
    assert_eq!(feature.all_files["progress-log"].len(), 2);

    assert_eq!(feature.conflicts.len(), 1);
    let conflict = &feature.conflicts[0];
    assert_eq!(conflict.selected_path, "docs/foo/90_PROGRESS_LOG.yaml");
    assert!(conflict.reason.contains("active"));
    assert!(!conflict.has_explicit_primary);
    assert_eq!(feature.base_dir.as_deref(), Some("docs/foo"));
}

/// Scenario B: three tagged design files, none primary, none archived,
/// distinct modification times. The newest wins with low confidence and
/// the conflict report lists all three.
#[test]
fn latest_modified_breaks_three_way_design_conflict() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("docs").join("bar");
    fs::create_dir_all(&dir).unwrap();
    let design = "schema: ai-coding/design@1.0\nmeta:\n  feature: bar\n";
    for name in ["design-a.yaml", "design-b.yaml", "design-c.yaml"] {
        fs::write(dir.join(name), design).unwrap();
    }
    set_modified(&dir.join("design-a.yaml"), 1_000);
    set_modified(&dir.join("design-c.yaml"), 2_000);
    set_modified(&dir.join("design-b.yaml"), 3_000);

    let result = scanner().scan(temp.path()).unwrap();
    let feature = &result.features["bar"];

    let primary = &feature.primary_files["design"];
    assert_eq!(primary.path, "docs/bar/design-b.yaml");

    assert_eq!(feature.conflicts.len(), 1);
    let conflict = &feature.conflicts[0];
    assert_eq!(
        conflict.instance_paths,
        vec![
            "docs/bar/design-a.yaml".to_string(),
            "docs/bar/design-b.yaml".to_string(),
            "docs/bar/design-c.yaml".to_string(),
        ]
    );
    assert!(conflict.reason.contains("recently modified"));
}

/// Scenario C: a well-formed but unregistered tag lands in the
/// unknown-schema list and never reaches any feature mapping.
#[test]
fn unregistered_tag_is_surfaced_not_grouped() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("docs").join("baz");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("widget.yaml"),
        "schema: custom/widget@1.0\nmeta:\n  feature: baz\n",
    )
    .unwrap();

    let result = scanner().scan(temp.path()).unwrap();
    assert!(result.features.is_empty());
    assert_eq!(result.unknown_schemas.len(), 1);

    let item = &result.unknown_schemas[0];
    assert_eq!(item.category, UnknownSchemaCategory::Unknown);
    assert_eq!(item.file.schema_id, "custom/widget@1.0");
    assert!(item.suggestion.contains("register"));
}

/// Scenario D: a tagless file named by the legacy convention classifies
/// through the rule table with its feature inferred from the path.
#[test]
fn legacy_file_classifies_by_filename_convention() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("features").join("checkout");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("90_PROGRESS_LOG.yaml"), "phase: 1\ntasks: []\n").unwrap();

    let result = scanner().scan(temp.path()).unwrap();
    let feature = &result.features["checkout"];
    let primary = &feature.primary_files["progress-log"];

    assert_eq!(primary.schema_id, "ai-coding/progress-log@1.0");
    assert!(primary.legacy);
    assert_eq!(primary.feature.as_deref(), Some("checkout"));
    assert_eq!(result.stats.legacy_files, 1);
}

/// Explicit primary declarations beat every heuristic, including newer
/// modification times.
#[test]
fn explicit_primary_wins_end_to_end() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("docs").join("pay");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("design-main.yaml"),
        "schema: ai-coding/design@1.0\nmeta:\n  feature: pay\nprimary: true\n",
    )
    .unwrap();
    fs::write(
        dir.join("design-draft.yaml"),
        "schema: ai-coding/design@1.0\nmeta:\n  feature: pay\n",
    )
    .unwrap();
    set_modified(&dir.join("design-main.yaml"), 1_000);
    set_modified(&dir.join("design-draft.yaml"), 9_000);

    let result = scanner().scan(temp.path()).unwrap();
    let feature = &result.features["pay"];
    assert_eq!(
        feature.primary_files["design"].path,
        "docs/pay/design-main.yaml"
    );
    assert!(feature.conflicts[0].has_explicit_primary);
}

/// A frontmatter design document and a YAML progress log group under the
/// same feature.
#[test]
fn mixed_carriers_group_under_one_feature() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("features").join("auth");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("90_PROGRESS_LOG.yaml"),
        "schema: ai-coding/progress-log@1.0\nmeta:\n  feature: auth\nphase: 3\n",
    )
    .unwrap();
    fs::write(
        dir.join("overview.md"),
        "---\nschema: ai-coding/design@1.0\nmeta:\n  feature: auth\n---\n# Auth design\n",
    )
    .unwrap();

    let result = scanner().scan(temp.path()).unwrap();
    let feature = &result.features["auth"];
    assert_eq!(feature.primary_files.len(), 2);
    assert!(feature.primary_files.contains_key("progress-log"));
    assert!(feature.primary_files.contains_key("design"));
    assert!(feature.conflicts.is_empty());
    assert_eq!(result.stats.files_classified, 2);
}

/// The async variant produces the same result as the blocking one.
#[tokio::test]
async fn async_scan_matches_sync_scan() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("docs").join("foo");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("90_PROGRESS_LOG.yaml"), "feature: foo\nphase: 1\n").unwrap();
    fs::write(
        dir.join("DESIGN.md"),
        "---\nmeta:\n  feature: foo\n---\n# Design\n",
    )
    .unwrap();

    let scanner = scanner();
    let sync = scanner.scan(temp.path()).unwrap();
    let asynced = scanner.scan_async(temp.path()).await.unwrap();

    assert_eq!(sync.features, asynced.features);
    assert_eq!(sync.unknown_schemas, asynced.unknown_schemas);
    assert_eq!(sync.stats.files_classified, asynced.stats.files_classified);
}

/// Single-instance groups resolve without conflict reports, end to end.
#[test]
fn single_instances_never_conflict() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("docs").join("solo");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("90_PROGRESS_LOG.yaml"), "feature: solo\n").unwrap();

    let result = scanner().scan(temp.path()).unwrap();
    let feature = &result.features["solo"];
    assert!(feature.conflicts.is_empty());
    assert_eq!(feature.primary_files.len(), 1);

    // The resolver agrees when asked directly.
    let resolver = scout_discovery::MultiInstanceResolver::default();
    let resolution = resolver.resolve(
        "progress-log",
        &feature.all_files["progress-log"],
    );
    assert_eq!(resolution.reason, ResolutionReason::SingleInstance);
    assert!(resolution.confident);
}
