//! Versioned migration scripts.

use crate::checksum::compute_checksum;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Statement terminator inside a script file.
pub const STATEMENT_TERMINATOR: char = ';';

/// Version number of a migration script, taken from its file name.
///
/// `Version::NONE` (0) doubles as the "nothing applied yet" ledger sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct Version(u32);

impl Version {
    /// Sentinel for an empty ledger.
    pub const NONE: Version = Version(0);

    /// Wrap a raw version number.
    pub const fn new(version: u32) -> Self {
        Self(version)
    }

    /// Return the raw version number.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{:03}", self.0)
    }
}

impl From<u32> for Version {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// A discovered migration script.
///
/// Scripts are immutable once built by the script repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationScript {
    version: Version,
    name: String,
    #[serde(skip)]
    path: PathBuf,
    #[serde(skip)]
    statements: Vec<String>,
    #[serde(skip)]
    checksum: String,
}

impl MigrationScript {
    /// Build a script from its parsed version, file name, path, and raw contents.
    pub fn new(version: Version, name: impl Into<String>, path: PathBuf, contents: &str) -> Self {
        Self {
            version,
            name: name.into(),
            path,
            statements: split_statements(contents),
            checksum: compute_checksum(contents),
        }
    }

    /// Version parsed from the file name.
    pub fn version(&self) -> Version {
        self.version
    }

    /// File name, recorded in the ledger.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location the script was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Statements in file order.
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// SHA-256 of the file contents as read, before statement splitting.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }
}

impl fmt::Display for MigrationScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Split script text into trimmed, non-empty statements.
///
/// `"A; B;; C"` yields `["A", "B", "C"]`. Terminators inside string literals
/// or comments are not special-cased.
pub fn split_statements(contents: &str) -> Vec<String> {
    contents
        .split(STATEMENT_TERMINATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
