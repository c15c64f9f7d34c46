use scout_discovery::{
    ScanResult, Severity, ValidationReport, ValidationStatus,
};
use scout_schema::SchemaRegistry;

/// Human-readable scan summary.
pub(crate) fn render_scan(result: &ScanResult) {
    for warning in &result.warnings {
        println!("note: {warning}");
    }

    if result.features.is_empty() {
        println!("no features discovered");
    }

    for (name, feature) in &result.features {
        println!("feature {name}");
        if let Some(base_dir) = &feature.base_dir {
            println!("  base: {base_dir}/");
        }
        for (file_type, primary) in &feature.primary_files {
            let count = feature
                .all_files
                .get(file_type)
                .map(Vec::len)
                .unwrap_or(0);
            let legacy = if primary.legacy { " [legacy]" } else { "" };
            if count > 1 {
                println!(
                    "  {file_type}: {}{legacy} ({count} instances)",
                    primary.path
                );
            } else {
                println!("  {file_type}: {}{legacy}", primary.path);
            }
        }
        for conflict in &feature.conflicts {
            println!(
                "  conflict on {}: picked {} ({})",
                conflict.file_type, conflict.selected_path, conflict.reason
            );
        }
    }

    if !result.project_files.is_empty() {
        println!("project files");
        for file in &result.project_files {
            println!("  {} ({})", file.path, file.schema_id);
        }
    }

    if !result.unknown_schemas.is_empty() {
        println!("unclassified schema tags");
        for item in &result.unknown_schemas {
            println!(
                "  {} [{}] {}",
                item.file.path,
                item.category.as_str(),
                item.suggestion
            );
        }
    }

    println!(
        "{} feature(s), {} of {} file(s) classified ({} legacy) in {} ms",
        result.features.len(),
        result.stats.files_classified,
        result.stats.files_visited,
        result.stats.legacy_files,
        result.stats.elapsed_ms
    );
}

/// Human-readable validation report.
pub(crate) fn render_validation(report: &ValidationReport) {
    for (name, feature) in &report.features {
        println!("feature {name}: {}", status_label(feature.status));
        for issue in &feature.issues {
            let severity = match issue.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Info => "info",
            };
            println!("  {severity} [{}] {}", issue.code, issue.message);
            if let Some(suggestion) = &issue.suggestion {
                println!("    hint: {suggestion}");
            }
        }
    }
    for issue in &report.project_issues {
        println!("project: {}", issue.message);
    }
    println!("overall: {}", status_label(report.status));
}

pub(crate) fn render_schemas(registry: &SchemaRegistry) {
    for def in registry.all() {
        let version = def
            .version
            .as_deref()
            .map(|v| format!("@{v}"))
            .unwrap_or_default();
        let required = if def.required { " (required)" } else { "" };
        println!("{}{version}{required}", def.id);
        println!("  {}", def.description);
    }
}

fn status_label(status: ValidationStatus) -> &'static str {
    match status {
        ValidationStatus::Valid => "valid",
        ValidationStatus::Warning => "warning",
        ValidationStatus::Error => "error",
    }
}
