//! Outcomes of `migrate` and `status`.

use crate::bootstrap::KeyspaceAction;
use crate::ledger::AppliedMigration;
use cm_core::{MigrationScript, Version};
use serde::Serialize;

/// Result of a successful migration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Number of scripts found in the script directory
    pub discovered: usize,
    /// Bootstrap outcome; `None` when no scripts were found and bootstrap was skipped
    pub keyspace: Option<KeyspaceAction>,
    /// Last applied version before this run
    pub previous_version: Version,
    /// Scripts applied by this run, in order
    pub applied: Vec<AppliedMigration>,
}

impl MigrationReport {
    pub(crate) fn nothing_discovered() -> Self {
        Self {
            discovered: 0,
            keyspace: None,
            previous_version: Version::NONE,
            applied: Vec::new(),
        }
    }

    /// True when the run applied nothing.
    pub fn is_up_to_date(&self) -> bool {
        self.applied.is_empty()
    }

    /// Highest version in the ledger after the run.
    pub fn current_version(&self) -> Version {
        self.applied
            .last()
            .map(|m| m.version)
            .unwrap_or(self.previous_version)
    }
}

/// Read-only view of the ledger against the script directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub keyspace: String,
    pub keyspace_present: bool,
    pub last_applied: Version,
    pub applied: Vec<AppliedMigration>,
    pub pending: Vec<MigrationScript>,
    /// Applied scripts whose file no longer matches the recorded checksum;
    /// always empty unless checksums are enabled
    pub modified: Vec<String>,
}
