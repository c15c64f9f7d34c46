use serde::{Deserialize, Serialize};

/// Statistics about one scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Number of files visited during traversal (before extension filtering).
    pub files_visited: usize,

    /// Files that ended up with a recognized or legacy schema.
    pub files_classified: usize,

    /// Subset of classified files that went through the legacy detector.
    pub legacy_files: usize,

    /// Files skipped because their content failed to parse.
    pub parse_errors: usize,

    /// Time taken in milliseconds.
    pub elapsed_ms: u64,

    /// Non-fatal problems encountered along the way.
    pub errors: Vec<String>,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_visited(&mut self) {
        self.files_visited += 1;
    }

    pub fn add_classified(&mut self, legacy: bool) {
        self.files_classified += 1;
        if legacy {
            self.legacy_files += 1;
        }
    }

    pub fn add_parse_error(&mut self, error: String) {
        self.parse_errors += 1;
        self.errors.push(error);
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }
}
