//! # Scout Discovery
//!
//! Schema discovery over a project tree.
//!
//! ## Pipeline
//!
//! ```text
//! Project root
//!     │
//!     ├──> Walk (bounded depth, ignore globs, symlink policy)
//!     │      └─> YAML / Markdown candidates
//!     │
//!     ├──> Parse + classify (explicit tag, else legacy filename rule)
//!     │      └─> DiscoveredFile / unknown-schema item
//!     │
//!     ├──> Group by feature and file-type
//!     │      └─> Multi-instance resolver per group
//!     │
//!     └──> ScanResult ──> Validator ──> ValidationReport
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use scout_discovery::{ProjectConfig, ProjectScanner, Validator};
//! use scout_schema::SchemaRegistry;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let root = Path::new("/path/to/project");
//!     let scanner = ProjectScanner::from_project_root(SchemaRegistry::with_builtins(), root)?;
//!     let result = scanner.scan(root)?;
//!
//!     let validator = Validator::new(scanner.registry().clone());
//!     let report = validator.validate(&result, &scanner.config().feature_spec());
//!     println!("{} feature(s), status {:?}", result.features.len(), report.status);
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod legacy;
mod report;
mod resolver;
mod scanner;
mod stats;
mod types;
mod validator;

pub use config::{ProjectConfig, CONFIG_FILE_NAMES};
pub use error::{DiscoveryError, Result};
pub use legacy::{infer_feature_from_path, LegacyDetector, LegacyRule};
pub use report::{display_name, ConflictReportUi, DiscoveredFileInfo};
pub use resolver::{
    default_archived_statuses, ConflictDiagnostics, ConflictReport, MultiInstanceResolver,
    ResolutionReason, ResolutionResult, ResolutionStage,
};
pub use scanner::ProjectScanner;
pub use stats::ScanStats;
pub use types::{
    DiscoveredFile, FeatureScanResult, ScanResult, UnknownSchemaCategory, UnknownSchemaItem,
};
pub use validator::{
    FeatureSpec, FeatureValidationReport, FileTypeRule, Severity, ValidationIssue,
    ValidationReport, ValidationStatus, Validator,
};
