use crate::error::{DiscoveryError, Result};
use crate::resolver::{default_archived_statuses, ResolutionStage};
use crate::validator::{FeatureSpec, FileTypeRule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Conventional config filenames, searched at the project root in priority
/// order. First hit wins.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".feature-scout.yaml",
    ".feature-scout.yml",
    "feature-scout.yaml",
    "feature-scout.toml",
];

/// Scan-time configuration. Every field has a built-in default; a missing
/// config file is not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Relative-path globs excluded from traversal entirely.
    pub ignore: Vec<String>,

    /// Maximum directory depth below the project root.
    pub max_depth: usize,

    /// Whether the walk follows symbolic links.
    pub follow_symlinks: bool,

    /// Files larger than this are skipped without reading.
    pub max_file_size_bytes: u64,

    /// Lifecycle tags the resolver treats as "not active".
    pub archived_statuses: Vec<String>,

    /// Multi-instance priority chain override.
    pub priority_chain: Vec<ResolutionStage>,

    /// Per-file-type validation rule overrides, merged over the defaults.
    pub features: BTreeMap<String, FileTypeRule>,

    /// Notes produced while loading (e.g. "no config file found").
    #[serde(skip)]
    pub load_warnings: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            ignore: default_ignore_globs(),
            max_depth: 12,
            follow_symlinks: false,
            max_file_size_bytes: 1_048_576, // 1 MiB
            archived_statuses: default_archived_statuses(),
            priority_chain: ResolutionStage::DEFAULT_CHAIN.to_vec(),
            features: BTreeMap::new(),
            load_warnings: Vec::new(),
        }
    }
}

impl ProjectConfig {
    /// Load config from the conventional filenames at `root`. A missing
    /// file yields defaults plus a warning; a present-but-malformed file
    /// is a hard error.
    pub fn load(root: &Path) -> Result<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = root.join(name);
            if !path.is_file() {
                continue;
            }
            let text = std::fs::read_to_string(&path)?;
            let mut config = Self::parse(name, &text)?;
            config.validate()?;
            log::info!("loaded config from {}", path.display());
            config
                .load_warnings
                .push(format!("config loaded from {name}"));
            return Ok(config);
        }

        log::warn!(
            "no config file found at {}; using built-in defaults",
            root.display()
        );
        let mut config = Self::default();
        config.load_warnings.push(format!(
            "no config file found at {}; using built-in defaults",
            root.display()
        ));
        Ok(config)
    }

    fn parse(name: &str, text: &str) -> Result<Self> {
        if name.ends_with(".toml") {
            toml::from_str(text)
                .map_err(|e| DiscoveryError::Config(format!("{name}: {e}")))
        } else {
            serde_yaml::from_str(text)
                .map_err(|e| DiscoveryError::Config(format!("{name}: {e}")))
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(DiscoveryError::Config(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Feature specification: built-in defaults with this config's
    /// per-file-type overrides merged on top.
    pub fn feature_spec(&self) -> FeatureSpec {
        let mut spec = FeatureSpec::default();
        for (file_type, rule) in &self.features {
            spec.rules.insert(file_type.clone(), rule.clone());
        }
        spec
    }
}

/// Directory subtrees nobody wants artifact discovery to descend into.
fn default_ignore_globs() -> Vec<String> {
    [
        "**/node_modules/**",
        "**/.git/**",
        "**/target/**",
        "**/dist/**",
        "**/build/**",
        "**/__pycache__/**",
        "**/.venv/**",
        "**/.cache/**",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
