//! Run settings.
//!
//! Everything an organization run can be tuned with lives in
//! [`OrganizerConfig`]. Settings are built in code or from command-line
//! arguments; nothing is read from disk or the environment.

use crate::file_category::CategoryTable;
use crate::output::ARTIFACT_PREFIX;
use std::path::PathBuf;

/// Name of the folder created under the target to hold the category folders.
pub const DEFAULT_DESTINATION_ROOT: &str = "organized";

/// Settings for a single organization run.
#[derive(Debug, Clone)]
pub struct OrganizerConfig {
    /// Folder created directly under the target directory.
    pub destination_root: String,
    /// Files whose name starts with this are never moved.
    pub exclusion_prefix: String,
    /// Extension to category mapping.
    pub table: CategoryTable,
    /// Plan the moves without touching the filesystem.
    pub dry_run: bool,
}

impl OrganizerConfig {
    pub fn with_destination_root(mut self, name: impl Into<String>) -> Self {
        self.destination_root = name.into();
        self
    }

    pub fn with_exclusion_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.exclusion_prefix = prefix.into();
        self
    }

    pub fn with_table(mut self, table: CategoryTable) -> Self {
        self.table = table;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Whether `file_name` belongs to the tool itself.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        !self.exclusion_prefix.is_empty() && file_name.starts_with(&self.exclusion_prefix)
    }
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            destination_root: DEFAULT_DESTINATION_ROOT.to_string(),
            exclusion_prefix: ARTIFACT_PREFIX.to_string(),
            table: CategoryTable::default(),
            dry_run: false,
        }
    }
}

/// The user's desktop, `<home>/Desktop`, or `None` without a home directory.
pub fn default_target_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join("Desktop"))
}
