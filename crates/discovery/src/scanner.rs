use crate::config::ProjectConfig;
use crate::error::{DiscoveryError, Result};
use crate::legacy::{infer_feature_from_path, LegacyDetector};
use crate::resolver::MultiInstanceResolver;
use crate::stats::ScanStats;
use crate::types::{
    DiscoveredFile, FeatureScanResult, ScanResult, UnknownSchemaCategory, UnknownSchemaItem,
};
use globset::{Glob, GlobSet, GlobSetBuilder};
use scout_carrier::{extract_bool, extract_feature_id, extract_str, ParsedDocument};
use scout_schema::{validate_format, CarrierKind, SchemaRegistry, SchemaScope};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Instant, UNIX_EPOCH};
use walkdir::WalkDir;

/// Orchestrates tree traversal, parsing, classification, grouping, and
/// conflict resolution. One `scan` call owns its entire working set;
/// nothing escapes to shared state.
#[derive(Debug)]
pub struct ProjectScanner {
    registry: SchemaRegistry,
    config: ProjectConfig,
    detector: LegacyDetector,
    resolver: MultiInstanceResolver,
    ignore: GlobSet,
}

/// A file selected by the walk, before its content has been read.
struct Candidate {
    rel_path: String,
    abs_path: PathBuf,
    carrier: CarrierKind,
    size: u64,
    modified_ms: u64,
}

/// Working set accumulated while classifying files.
#[derive(Default)]
struct Accumulator {
    /// feature → file-type → candidates
    features: BTreeMap<String, BTreeMap<String, Vec<DiscoveredFile>>>,
    project_files: Vec<DiscoveredFile>,
    unknown_schemas: Vec<UnknownSchemaItem>,
}

impl ProjectScanner {
    pub fn new(registry: SchemaRegistry, config: ProjectConfig) -> Result<Self> {
        config.validate()?;
        let ignore = build_ignore_set(&config.ignore)?;
        let resolver = MultiInstanceResolver::new(
            config.priority_chain.clone(),
            config.archived_statuses.clone(),
        );
        Ok(Self {
            registry,
            config,
            detector: LegacyDetector::new(),
            resolver,
            ignore,
        })
    }

    /// Convenience: load the project's config from `root` and build a
    /// scanner around it.
    pub fn from_project_root(registry: SchemaRegistry, root: &Path) -> Result<Self> {
        let config = ProjectConfig::load(root)?;
        Self::new(registry, config)
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Walk the tree and classify every artifact file (blocking reads).
    pub fn scan(&self, root: &Path) -> Result<ScanResult> {
        let start = Instant::now();
        let mut stats = ScanStats::new();
        let candidates = self.collect_candidates(root, &mut stats)?;

        let mut acc = Accumulator::default();
        for candidate in candidates {
            match std::fs::read_to_string(&candidate.abs_path) {
                Ok(text) => self.ingest(&candidate, &text, &mut acc, &mut stats),
                Err(err) => {
                    // Unreadable file: dropped, not retried.
                    log::warn!("failed to read {}: {err}", candidate.rel_path);
                    stats.add_error(format!("{}: {err}", candidate.rel_path));
                }
            }
        }

        Ok(self.assemble(acc, stats, start))
    }

    /// Non-blocking variant with identical semantics; only the file reads
    /// suspend.
    pub async fn scan_async(&self, root: &Path) -> Result<ScanResult> {
        let start = Instant::now();
        let mut stats = ScanStats::new();
        let candidates = self.collect_candidates(root, &mut stats)?;

        let mut acc = Accumulator::default();
        for candidate in candidates {
            match tokio::fs::read_to_string(&candidate.abs_path).await {
                Ok(text) => self.ingest(&candidate, &text, &mut acc, &mut stats),
                Err(err) => {
                    log::warn!("failed to read {}: {err}", candidate.rel_path);
                    stats.add_error(format!("{}: {err}", candidate.rel_path));
                }
            }
        }

        Ok(self.assemble(acc, stats, start))
    }

    /// Bounded-depth walk honoring the ignore globs and symlink policy.
    fn collect_candidates(&self, root: &Path, stats: &mut ScanStats) -> Result<Vec<Candidate>> {
        if !root.is_dir() {
            return Err(DiscoveryError::InvalidRoot(format!(
                "{} does not exist or is not a directory",
                root.display()
            )));
        }

        let mut candidates = Vec::new();
        let walker = WalkDir::new(root)
            .max_depth(self.config.max_depth)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !matches_ignore(&self.ignore, root, entry.path())
            });

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    // Permission-denied subtree or similar: skip, continue.
                    log::warn!("failed to read entry: {err}");
                    stats.add_error(format!("walk: {err}"));
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            stats.add_visited();

            let Some(rel_path) = normalize_relative_path(root, entry.path()) else {
                continue;
            };
            let Some(carrier) = carrier_for_path(entry.path()) else {
                continue;
            };

            let Ok(meta) = entry.metadata() else {
                log::warn!("failed to stat {rel_path}");
                continue;
            };
            if meta.len() > self.config.max_file_size_bytes {
                log::debug!(
                    "skipping large file {rel_path} ({} bytes > {})",
                    meta.len(),
                    self.config.max_file_size_bytes
                );
                continue;
            }

            candidates.push(Candidate {
                rel_path,
                abs_path: entry.path().to_path_buf(),
                carrier,
                size: meta.len(),
                modified_ms: modified_epoch_ms(&meta),
            });
        }

        Ok(candidates)
    }

    /// Parse and classify one file's content.
    fn ingest(
        &self,
        candidate: &Candidate,
        text: &str,
        acc: &mut Accumulator,
        stats: &mut ScanStats,
    ) {
        let parsed = match scout_carrier::parse(candidate.carrier, text) {
            Ok(parsed) => parsed,
            Err(err) => {
                log::warn!("failed to parse {}: {err}", candidate.rel_path);
                stats.add_parse_error(format!("{}: {err}", candidate.rel_path));
                return;
            }
        };

        match parsed.schema_tag.clone() {
            Some(tag) => self.ingest_tagged(candidate, &parsed, tag, acc, stats),
            None => match self.detector.detect(
                &candidate.rel_path,
                &parsed,
                candidate.modified_ms,
                candidate.size,
            ) {
                Some(file) => {
                    stats.add_classified(true);
                    self.place(file, acc, stats);
                }
                // No tag, no rule: the file carries no schema-relevant
                // information and is dropped from the result.
                None => log::debug!("no schema information in {}", candidate.rel_path),
            },
        }
    }

    /// Explicit-tag pipeline: lexical format, then registry lookup, then
    /// carrier support.
    fn ingest_tagged(
        &self,
        candidate: &Candidate,
        parsed: &ParsedDocument,
        tag: String,
        acc: &mut Accumulator,
        stats: &mut ScanStats,
    ) {
        if !validate_format(&tag) {
            let suggestion = format!(
                "schema tag '{tag}' is not a valid identifier; expected \
                 namespace/name[@major.minor] in lowercase"
            );
            self.push_unknown(
                candidate,
                parsed,
                &tag,
                UnknownSchemaCategory::Invalid,
                suggestion,
                acc,
            );
            return;
        }

        let Some(def) = self.registry.get(&tag).cloned() else {
            let suggestion = format!(
                "schema '{}' is not registered; register it or correct the tag",
                scout_schema::base_id(&tag)
            );
            self.push_unknown(
                candidate,
                parsed,
                &tag,
                UnknownSchemaCategory::Unknown,
                suggestion,
                acc,
            );
            return;
        };

        if !def.supports_carrier(candidate.carrier) {
            let supported: Vec<&str> =
                def.carriers.iter().map(|c| c.as_str()).collect();
            let suggestion = format!(
                "schema '{}' cannot be carried in a {} file; supported: {}",
                def.id,
                candidate.carrier.as_str(),
                supported.join(", ")
            );
            self.push_unknown(
                candidate,
                parsed,
                &tag,
                UnknownSchemaCategory::Invalid,
                suggestion,
                acc,
            );
            return;
        }

        let feature = extract_feature_id(
            parsed.value.as_ref(),
            &def.identifier_field,
            &def.fallback_fields,
        )
        .or_else(|| infer_feature_from_path(&candidate.rel_path));

        let file = DiscoveredFile {
            path: candidate.rel_path.clone(),
            schema_id: tag,
            carrier: candidate.carrier,
            content: parsed.value.clone(),
            modified_ms: candidate.modified_ms,
            size: candidate.size,
            legacy: false,
            is_primary: extract_bool(parsed.value.as_ref(), "primary")
                .or_else(|| extract_bool(parsed.value.as_ref(), "is_primary")),
            status: extract_str(parsed.value.as_ref(), "status"),
            version: extract_str(parsed.value.as_ref(), "version"),
            feature,
        };
        stats.add_classified(false);
        self.place(file, acc, stats);
    }

    /// Route a failed tag to the unknown-schema list, upgrading the
    /// category when the filename would classify under a legacy rule.
    fn push_unknown(
        &self,
        candidate: &Candidate,
        parsed: &ParsedDocument,
        tag: &str,
        category: UnknownSchemaCategory,
        suggestion: String,
        acc: &mut Accumulator,
    ) {
        let (category, suggestion) = match self.detector.matching_rule(&candidate.rel_path) {
            Some(rule) => (
                UnknownSchemaCategory::LegacyEligible,
                format!(
                    "{suggestion}; alternatively drop the tag to classify by \
                     filename convention as {}",
                    rule.schema_id
                ),
            ),
            None => (category, suggestion),
        };

        log::debug!(
            "unclassifiable schema tag '{tag}' in {} ({})",
            candidate.rel_path,
            category.as_str()
        );
        acc.unknown_schemas.push(UnknownSchemaItem {
            file: DiscoveredFile {
                path: candidate.rel_path.clone(),
                schema_id: tag.to_string(),
                carrier: candidate.carrier,
                content: parsed.value.clone(),
                modified_ms: candidate.modified_ms,
                size: candidate.size,
                legacy: false,
                is_primary: None,
                status: None,
                version: None,
                feature: None,
            },
            category,
            suggestion,
        });
    }

    /// Group a classified file by scope, feature, and file-type.
    fn place(&self, file: DiscoveredFile, acc: &mut Accumulator, stats: &mut ScanStats) {
        let scope = self
            .registry
            .get(&file.schema_id)
            .map(|def| def.scope)
            .unwrap_or(SchemaScope::Feature);

        if scope == SchemaScope::Project {
            acc.project_files.push(file);
            return;
        }

        let Some(feature) = file.feature.clone() else {
            log::warn!("no feature identifier for {}; dropping", file.path);
            stats.add_error(format!("{}: no feature identifier", file.path));
            return;
        };
        let file_type = file.file_type();
        acc.features
            .entry(feature)
            .or_default()
            .entry(file_type)
            .or_default()
            .push(file);
    }

    /// Resolve every multi-candidate group and build the final result.
    fn assemble(&self, acc: Accumulator, mut stats: ScanStats, start: Instant) -> ScanResult {
        let mut features = BTreeMap::new();

        for (name, groups) in acc.features {
            let mut result = FeatureScanResult {
                feature: name.clone(),
                ..Default::default()
            };
            let mut paths = Vec::new();

            for (file_type, mut files) in groups {
                files.sort_by(|a, b| a.path.cmp(&b.path));
                let resolution = self.resolver.resolve(&file_type, &files);
                if let Some(primary) = resolution.primary {
                    result.primary_files.insert(file_type.clone(), primary);
                }
                if let Some(conflict) = resolution.conflict {
                    result.conflicts.push(conflict);
                }
                paths.extend(files.iter().map(|f| f.path.clone()));
                result.all_files.insert(file_type, files);
            }

            result.base_dir = common_base_dir(&paths);
            features.insert(name, result);
        }

        let mut project_files = acc.project_files;
        project_files.sort_by(|a, b| a.path.cmp(&b.path));
        let mut unknown_schemas = acc.unknown_schemas;
        unknown_schemas.sort_by(|a, b| a.file.path.cmp(&b.file.path));

        stats.elapsed_ms = start.elapsed().as_millis() as u64;
        log::info!(
            "scan complete: {} feature(s), {} classified of {} visited in {} ms",
            features.len(),
            stats.files_classified,
            stats.files_visited,
            stats.elapsed_ms
        );

        ScanResult {
            features,
            project_files,
            unknown_schemas,
            warnings: self.config.load_warnings.clone(),
            stats,
        }
    }
}

/// Compile the ignore globs. Patterns ending in `/**` also get their bare
/// prefix registered so whole directories prune without descending.
fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| DiscoveryError::Config(format!("bad ignore glob '{pattern}': {e}")))?;
        builder.add(glob);
        if let Some(prefix) = pattern.strip_suffix("/**") {
            let glob = Glob::new(prefix).map_err(|e| {
                DiscoveryError::Config(format!("bad ignore glob '{pattern}': {e}"))
            })?;
            builder.add(glob);
        }
    }
    builder
        .build()
        .map_err(|e| DiscoveryError::Config(format!("bad ignore globs: {e}")))
}

fn matches_ignore(ignore: &GlobSet, root: &Path, path: &Path) -> bool {
    match normalize_relative_path(root, path) {
        Some(rel) => ignore.is_match(&rel),
        None => false,
    }
}

/// Root-relative path with forward slashes.
fn normalize_relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let rel = rel.to_string_lossy().into_owned();
    Some(rel.replace('\\', "/"))
}

fn carrier_for_path(path: &Path) -> Option<CarrierKind> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    CarrierKind::from_extension(&ext)
}

fn modified_epoch_ms(meta: &std::fs::Metadata) -> u64 {
    meta.modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Shallowest common path prefix of a set of relative file paths.
fn common_base_dir(paths: &[String]) -> Option<String> {
    let mut prefix: Option<Vec<&str>> = None;
    for path in paths {
        let segments: Vec<&str> = path.split('/').collect();
        let dirs = &segments[..segments.len().saturating_sub(1)];
        prefix = Some(match prefix {
            None => dirs.to_vec(),
            Some(current) => current
                .iter()
                .zip(dirs)
                .take_while(|(a, b)| *a == *b)
                .map(|(a, _)| *a)
                .collect(),
        });
    }
    let prefix = prefix?;
    if prefix.is_empty() {
        None
    } else {
        Some(prefix.join("/"))
    }
}
