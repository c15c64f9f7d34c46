use crate::types::DiscoveredFile;
use serde::{Deserialize, Serialize};

/// One stage of the multi-instance priority chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStage {
    ExplicitPrimary,
    ActiveStatus,
    LatestModified,
    ShallowestPath,
    Alphabetical,
}

impl ResolutionStage {
    pub const DEFAULT_CHAIN: &'static [ResolutionStage] = &[
        ResolutionStage::ExplicitPrimary,
        ResolutionStage::ActiveStatus,
        ResolutionStage::LatestModified,
        ResolutionStage::ShallowestPath,
        ResolutionStage::Alphabetical,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ResolutionStage::ExplicitPrimary => "explicit_primary",
            ResolutionStage::ActiveStatus => "active_status",
            ResolutionStage::LatestModified => "latest_modified",
            ResolutionStage::ShallowestPath => "shallowest_path",
            ResolutionStage::Alphabetical => "alphabetical",
        }
    }
}

/// Why a particular candidate was selected as primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionReason {
    NoInstances,
    SingleInstance,
    ExplicitPrimary,
    ActiveStatus,
    LatestModified,
    ShallowestPath,
    Alphabetical,
}

impl ResolutionReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            ResolutionReason::NoInstances => "no_instances",
            ResolutionReason::SingleInstance => "single_instance",
            ResolutionReason::ExplicitPrimary => "explicit_primary",
            ResolutionReason::ActiveStatus => "active_status",
            ResolutionReason::LatestModified => "latest_modified",
            ResolutionReason::ShallowestPath => "shallowest_path",
            ResolutionReason::Alphabetical => "alphabetical",
        }
    }

    /// Fixed reason → human text table.
    pub const fn explanation(self) -> &'static str {
        match self {
            ResolutionReason::NoInstances => "no instances exist for this file type",
            ResolutionReason::SingleInstance => "only one instance exists",
            ResolutionReason::ExplicitPrimary => "exactly one instance declares itself primary",
            ResolutionReason::ActiveStatus => {
                "exactly one instance is active; the others are archived"
            }
            ResolutionReason::LatestModified => {
                "most recently modified instance (heuristic, not proof of intent)"
            }
            ResolutionReason::ShallowestPath => {
                "instance with the fewest path segments (heuristic)"
            }
            ResolutionReason::Alphabetical => {
                "lexicographically first path (last-resort tie-break)"
            }
        }
    }

    const fn from_stage(stage: ResolutionStage) -> Self {
        match stage {
            ResolutionStage::ExplicitPrimary => ResolutionReason::ExplicitPrimary,
            ResolutionStage::ActiveStatus => ResolutionReason::ActiveStatus,
            ResolutionStage::LatestModified => ResolutionReason::LatestModified,
            ResolutionStage::ShallowestPath => ResolutionReason::ShallowestPath,
            ResolutionStage::Alphabetical => ResolutionReason::Alphabetical,
        }
    }
}

/// Compact, user-facing conflict report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub file_type: String,
    /// Every candidate path, sorted.
    pub instance_paths: Vec<String>,
    pub selected_path: String,
    /// Human reason text from the fixed reason table.
    pub reason: String,
    /// Whether any instance declared itself primary.
    pub has_explicit_primary: bool,
}

/// Verbose, diagnostic conflict report with the ordered decision log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictDiagnostics {
    pub file_type: String,
    pub instances: Vec<DiscoveredFile>,
    pub reason: ResolutionReason,
    pub decision_log: Vec<String>,
}

/// Outcome of resolving one (feature, file-type) candidate group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub primary: Option<DiscoveredFile>,
    pub reason: ResolutionReason,
    /// High confidence only for explicit intent or unambiguous
    /// active-status filtering; heuristic tie-breaks are low.
    pub confident: bool,
    /// Full candidate list, sorted by path.
    pub candidates: Vec<DiscoveredFile>,
    /// Present iff more than one candidate was in play.
    pub conflict: Option<ConflictReport>,
    pub diagnostics: Option<ConflictDiagnostics>,
}

/// Deterministic primary selection over same-typed candidate files.
///
/// Evaluates an ordered pipeline of narrowing stages and short-circuits the
/// moment a stage leaves exactly one candidate. Pure function of its
/// inputs: identical candidate sets, in any order, yield identical results.
#[derive(Debug, Clone)]
pub struct MultiInstanceResolver {
    chain: Vec<ResolutionStage>,
    archived_statuses: Vec<String>,
}

impl Default for MultiInstanceResolver {
    fn default() -> Self {
        Self::new(
            ResolutionStage::DEFAULT_CHAIN.to_vec(),
            default_archived_statuses(),
        )
    }
}

/// Lifecycle tags treated as "not active" by the active-status stage.
pub fn default_archived_statuses() -> Vec<String> {
    ["archived", "backup", "deprecated", "obsolete"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl MultiInstanceResolver {
    /// Build a resolver from a stage chain and an archived-status
    /// vocabulary. A chain not ending in `alphabetical` gets it appended
    /// as terminal guard so resolution always lands on a singleton.
    pub fn new(mut chain: Vec<ResolutionStage>, archived_statuses: Vec<String>) -> Self {
        if chain.last() != Some(&ResolutionStage::Alphabetical) {
            chain.push(ResolutionStage::Alphabetical);
        }
        let archived_statuses = archived_statuses
            .into_iter()
            .map(|s| s.to_lowercase())
            .collect();
        Self {
            chain,
            archived_statuses,
        }
    }

    pub fn resolve(&self, file_type: &str, candidates: &[DiscoveredFile]) -> ResolutionResult {
        let mut sorted: Vec<DiscoveredFile> = candidates.to_vec();
        sorted.sort_by(|a, b| a.path.cmp(&b.path));

        if sorted.is_empty() {
            return ResolutionResult {
                primary: None,
                reason: ResolutionReason::NoInstances,
                confident: true,
                candidates: sorted,
                conflict: None,
                diagnostics: None,
            };
        }
        if sorted.len() == 1 {
            return ResolutionResult {
                primary: Some(sorted[0].clone()),
                reason: ResolutionReason::SingleInstance,
                confident: true,
                candidates: sorted,
                conflict: None,
                diagnostics: None,
            };
        }

        let mut log: Vec<String> = vec![format!(
            "{} candidates for file type '{file_type}'",
            sorted.len()
        )];
        let (winner, reason, confident) = self.run_chain(&sorted, &mut log);

        let conflict = ConflictReport {
            file_type: file_type.to_string(),
            instance_paths: sorted.iter().map(|f| f.path.clone()).collect(),
            selected_path: winner.path.clone(),
            reason: reason.explanation().to_string(),
            has_explicit_primary: sorted.iter().any(|f| f.is_primary == Some(true)),
        };
        let diagnostics = ConflictDiagnostics {
            file_type: file_type.to_string(),
            instances: sorted.clone(),
            reason,
            decision_log: log,
        };

        ResolutionResult {
            primary: Some(winner),
            reason,
            confident,
            candidates: sorted,
            conflict: Some(conflict),
            diagnostics: Some(diagnostics),
        }
    }

    /// Walk the stage pipeline over a multi-candidate set.
    fn run_chain(
        &self,
        sorted: &[DiscoveredFile],
        log: &mut Vec<String>,
    ) -> (DiscoveredFile, ResolutionReason, bool) {
        let mut current: Vec<&DiscoveredFile> = sorted.iter().collect();

        for &stage in &self.chain {
            let narrowed = match stage {
                ResolutionStage::ExplicitPrimary => self.stage_explicit_primary(&current, log),
                ResolutionStage::ActiveStatus => self.stage_active_status(&current, log),
                ResolutionStage::LatestModified => Self::stage_latest_modified(&current, log),
                ResolutionStage::ShallowestPath => Self::stage_shallowest_path(&current, log),
                ResolutionStage::Alphabetical => {
                    // Terminal: candidates are path-sorted already.
                    log.push(format!(
                        "alphabetical: selecting '{}' from {} remaining",
                        current[0].path,
                        current.len()
                    ));
                    vec![current[0]]
                }
            };

            if narrowed.len() == 1 {
                let reason = ResolutionReason::from_stage(stage);
                let confident = matches!(
                    stage,
                    ResolutionStage::ExplicitPrimary | ResolutionStage::ActiveStatus
                );
                log.push(format!(
                    "selected '{}' (reason: {})",
                    narrowed[0].path,
                    reason.as_str()
                ));
                return (narrowed[0].clone(), reason, confident);
            }
            current = narrowed;
        }

        // Unreachable with the terminal guard in place, but keep the
        // fallback total.
        (
            current[0].clone(),
            ResolutionReason::Alphabetical,
            false,
        )
    }

    fn stage_explicit_primary<'a>(
        &self,
        current: &[&'a DiscoveredFile],
        log: &mut Vec<String>,
    ) -> Vec<&'a DiscoveredFile> {
        let declared: Vec<&DiscoveredFile> = current
            .iter()
            .copied()
            .filter(|f| f.is_primary == Some(true))
            .collect();
        log.push(format!(
            "explicit_primary: {} of {} declare primary",
            declared.len(),
            current.len()
        ));
        match declared.len() {
            0 => current.to_vec(),
            // Ambiguity among explicit claims: continue the chain over the
            // declared subset, never pick arbitrarily.
            _ => declared,
        }
    }

    fn stage_active_status<'a>(
        &self,
        current: &[&'a DiscoveredFile],
        log: &mut Vec<String>,
    ) -> Vec<&'a DiscoveredFile> {
        let active: Vec<&DiscoveredFile> = current
            .iter()
            .copied()
            .filter(|f| !self.is_archived(f))
            .collect();
        if active.is_empty() {
            // An all-archived group still needs a primary.
            log.push(format!(
                "active_status: all {} candidates archived; keeping full set",
                current.len()
            ));
            return current.to_vec();
        }
        log.push(format!(
            "active_status: {} of {} candidates active",
            active.len(),
            current.len()
        ));
        active
    }

    fn stage_latest_modified<'a>(
        current: &[&'a DiscoveredFile],
        log: &mut Vec<String>,
    ) -> Vec<&'a DiscoveredFile> {
        let max = current.iter().map(|f| f.modified_ms).max().unwrap_or(0);
        let latest: Vec<&DiscoveredFile> = current
            .iter()
            .copied()
            .filter(|f| f.modified_ms == max)
            .collect();
        log.push(format!(
            "latest_modified: {} of {} candidates at {max} ms",
            latest.len(),
            current.len()
        ));
        latest
    }

    fn stage_shallowest_path<'a>(
        current: &[&'a DiscoveredFile],
        log: &mut Vec<String>,
    ) -> Vec<&'a DiscoveredFile> {
        let min = current
            .iter()
            .map(|f| f.path_depth())
            .min()
            .unwrap_or(0);
        let shallowest: Vec<&DiscoveredFile> = current
            .iter()
            .copied()
            .filter(|f| f.path_depth() == min)
            .collect();
        log.push(format!(
            "shallowest_path: {} of {} candidates at depth {min}",
            shallowest.len(),
            current.len()
        ));
        shallowest
    }

    fn is_archived(&self, file: &DiscoveredFile) -> bool {
        file.status
            .as_deref()
            .map(|s| self.archived_statuses.iter().any(|a| a == &s.to_lowercase()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scout_schema::CarrierKind;

    fn file(path: &str, modified_ms: u64) -> DiscoveredFile {
        DiscoveredFile {
            path: path.to_string(),
            schema_id: "ai-coding/design@1.0".to_string(),
            carrier: CarrierKind::Yaml,
            content: None,
            modified_ms,
            size: 0,
            legacy: false,
            is_primary: None,
            status: None,
            version: None,
            feature: Some("foo".to_string()),
        }
    }

    fn with_primary(mut f: DiscoveredFile) -> DiscoveredFile {
        f.is_primary = Some(true);
        f
    }

    fn with_status(mut f: DiscoveredFile, status: &str) -> DiscoveredFile {
        f.status = Some(status.to_string());
        f
    }

    #[test]
    fn no_instances_is_trivial() {
        let resolver = MultiInstanceResolver::default();
        let result = resolver.resolve("design", &[]);
        assert_eq!(result.reason, ResolutionReason::NoInstances);
        assert!(result.primary.is_none());
        assert!(result.conflict.is_none());
    }

    #[test]
    fn single_instance_is_confident_with_no_conflict() {
        let resolver = MultiInstanceResolver::default();
        let result = resolver.resolve("design", &[file("a/design.yaml", 10)]);
        assert_eq!(result.reason, ResolutionReason::SingleInstance);
        assert!(result.confident);
        assert!(result.conflict.is_none());
        assert!(result.diagnostics.is_none());
    }

    #[test]
    fn explicit_primary_beats_newer_and_shallower_rivals() {
        let resolver = MultiInstanceResolver::default();
        let candidates = vec![
            file("design.yaml", 999),
            with_primary(file("deep/nested/design.yaml", 1)),
        ];
        let result = resolver.resolve("design", &candidates);
        assert_eq!(result.reason, ResolutionReason::ExplicitPrimary);
        assert!(result.confident);
        assert_eq!(
            result.primary.unwrap().path,
            "deep/nested/design.yaml"
        );
    }

    #[test]
    fn competing_primaries_narrow_then_continue_the_chain() {
        let resolver = MultiInstanceResolver::default();
        let candidates = vec![
            with_primary(file("a/design.yaml", 5)),
            with_primary(file("b/design.yaml", 9)),
            file("c/design.yaml", 100),
        ];
        let result = resolver.resolve("design", &candidates);
        // The undeclared newest file is out of the running; the chain
        // continues over the two declared primaries.
        assert_eq!(result.reason, ResolutionReason::LatestModified);
        assert!(!result.confident);
        assert_eq!(result.primary.unwrap().path, "b/design.yaml");
    }

    #[test]
    fn single_active_among_archived_is_confident() {
        let resolver = MultiInstanceResolver::default();
        let candidates = vec![
            with_status(file("a/_old/design.yaml", 100), "archived"),
            file("a/design.yaml", 1),
            with_status(file("a/bak/design.yaml", 50), "Backup"),
        ];
        let result = resolver.resolve("design", &candidates);
        assert_eq!(result.reason, ResolutionReason::ActiveStatus);
        assert!(result.confident);
        assert_eq!(result.primary.unwrap().path, "a/design.yaml");
    }

    #[test]
    fn all_archived_group_still_gets_a_primary() {
        let resolver = MultiInstanceResolver::default();
        let candidates = vec![
            with_status(file("a/design.yaml", 5), "archived"),
            with_status(file("b/design.yaml", 9), "obsolete"),
        ];
        let result = resolver.resolve("design", &candidates);
        assert_eq!(result.reason, ResolutionReason::LatestModified);
        assert_eq!(result.primary.unwrap().path, "b/design.yaml");
    }

    #[test]
    fn latest_modified_wins_with_low_confidence() {
        let resolver = MultiInstanceResolver::default();
        let candidates = vec![
            file("a/design.yaml", 1),
            file("b/design.yaml", 3),
            file("c/design.yaml", 2),
        ];
        let result = resolver.resolve("design", &candidates);
        assert_eq!(result.reason, ResolutionReason::LatestModified);
        assert!(!result.confident);
        assert_eq!(result.primary.unwrap().path, "b/design.yaml");
        let conflict = result.conflict.unwrap();
        assert_eq!(conflict.instance_paths.len(), 3);
        assert!(!conflict.has_explicit_primary);
    }

    #[test]
    fn modified_tie_falls_to_shallowest_path() {
        let resolver = MultiInstanceResolver::default();
        let candidates = vec![
            file("docs/foo/archive/design.yaml", 7),
            file("docs/design.yaml", 7),
        ];
        let result = resolver.resolve("design", &candidates);
        assert_eq!(result.reason, ResolutionReason::ShallowestPath);
        assert!(!result.confident);
        assert_eq!(result.primary.unwrap().path, "docs/design.yaml");
    }

    #[test]
    fn full_tie_falls_to_alphabetical() {
        let resolver = MultiInstanceResolver::default();
        let candidates = vec![file("b/design.yaml", 7), file("a/design.yaml", 7)];
        let result = resolver.resolve("design", &candidates);
        assert_eq!(result.reason, ResolutionReason::Alphabetical);
        assert!(!result.confident);
        assert_eq!(result.primary.unwrap().path, "a/design.yaml");
    }

    #[test]
    fn resolution_is_order_independent() {
        let resolver = MultiInstanceResolver::default();
        let a = with_status(file("x/design.yaml", 4), "archived");
        let b = file("y/design.yaml", 2);
        let c = file("z/design.yaml", 9);

        let forward = resolver.resolve("design", &[a.clone(), b.clone(), c.clone()]);
        let backward = resolver.resolve("design", &[c, b, a]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn truncated_custom_chain_gets_terminal_guard() {
        let resolver = MultiInstanceResolver::new(
            vec![ResolutionStage::ExplicitPrimary],
            default_archived_statuses(),
        );
        let candidates = vec![file("b/design.yaml", 1), file("a/design.yaml", 2)];
        let result = resolver.resolve("design", &candidates);
        assert_eq!(result.reason, ResolutionReason::Alphabetical);
        assert_eq!(result.primary.unwrap().path, "a/design.yaml");
    }

    #[test]
    fn decision_log_narrates_each_stage() {
        let resolver = MultiInstanceResolver::default();
        let candidates = vec![file("a/design.yaml", 1), file("b/design.yaml", 2)];
        let result = resolver.resolve("design", &candidates);
        let log = result.diagnostics.unwrap().decision_log;
        assert!(log.iter().any(|l| l.starts_with("explicit_primary:")));
        assert!(log.iter().any(|l| l.starts_with("active_status:")));
        assert!(log.iter().any(|l| l.starts_with("latest_modified:")));
        assert!(log.iter().any(|l| l.starts_with("selected ")));
    }
}
