use crate::definition::{CarrierKind, SchemaDefinition, SchemaScope};
use crate::id::base_id;
use std::collections::HashMap;

/// Catalog of known schemas, keyed by base identifier.
///
/// A plain value: construct one per scanner/validator instead of sharing
/// process-wide state. Lookups accept both versioned and unversioned
/// identifier forms; registration is last-write-wins by base identifier.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<String, SchemaDefinition>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            schemas: HashMap::new(),
        }
    }

    /// Create a registry pre-loaded with the built-in `ai-coding/*` catalog.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for def in builtin_schemas() {
            registry.register(def);
        }
        registry
    }

    /// Insert or overwrite a definition by its base identifier.
    pub fn register(&mut self, def: SchemaDefinition) {
        self.schemas.insert(def.id.clone(), def);
    }

    /// Look up a definition, accepting `ns/name` or `ns/name@M.m`.
    pub fn get(&self, id: &str) -> Option<&SchemaDefinition> {
        self.schemas.get(base_id(id))
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// All definitions with the given scope, sorted by identifier for
    /// deterministic iteration.
    pub fn by_scope(&self, scope: SchemaScope) -> Vec<&SchemaDefinition> {
        let mut defs: Vec<_> = self
            .schemas
            .values()
            .filter(|def| def.scope == scope)
            .collect();
        defs.sort_by(|a, b| a.id.cmp(&b.id));
        defs
    }

    /// All definitions flagged as required, sorted by identifier.
    pub fn required(&self) -> Vec<&SchemaDefinition> {
        let mut defs: Vec<_> = self.schemas.values().filter(|def| def.required).collect();
        defs.sort_by(|a, b| a.id.cmp(&b.id));
        defs
    }

    /// All definitions, sorted by identifier.
    pub fn all(&self) -> Vec<&SchemaDefinition> {
        let mut defs: Vec<_> = self.schemas.values().collect();
        defs.sort_by(|a, b| a.id.cmp(&b.id));
        defs
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

fn builtin(
    id: &str,
    version: &str,
    description: &str,
    scope: SchemaScope,
    required: bool,
    carriers: &[CarrierKind],
) -> SchemaDefinition {
    SchemaDefinition {
        id: id.to_string(),
        version: Some(version.to_string()),
        description: description.to_string(),
        scope,
        required,
        identifier_field: "meta.feature".to_string(),
        fallback_fields: vec!["feature".to_string(), "feature_id".to_string()],
        carriers: carriers.to_vec(),
    }
}

/// Built-in schema catalog for the conventional feature artifact set.
fn builtin_schemas() -> Vec<SchemaDefinition> {
    use CarrierKind::{MarkdownWithHeader, Yaml};
    use SchemaScope::{Feature, Project};

    vec![
        builtin(
            "ai-coding/progress-log",
            "1.0",
            "Per-feature progress log with task checklist and phase marker",
            Feature,
            true,
            &[Yaml],
        ),
        builtin(
            "ai-coding/phase-status",
            "1.0",
            "Current lifecycle phase of a feature",
            Feature,
            false,
            &[Yaml],
        ),
        builtin(
            "ai-coding/design",
            "1.0",
            "Design document for a feature",
            Feature,
            false,
            &[Yaml, MarkdownWithHeader],
        ),
        builtin(
            "ai-coding/requirements",
            "1.0",
            "Requirements document for a feature",
            Feature,
            false,
            &[MarkdownWithHeader],
        ),
        builtin(
            "ai-coding/test-plan",
            "1.0",
            "Test plan for a feature",
            Feature,
            false,
            &[Yaml, MarkdownWithHeader],
        ),
        builtin(
            "ai-coding/decision-record",
            "1.0",
            "Decision record attached to a feature",
            Feature,
            false,
            &[MarkdownWithHeader],
        ),
        builtin(
            "ai-coding/project-map",
            "1.0",
            "Project-wide feature map",
            Project,
            false,
            &[Yaml],
        ),
    ]
}
