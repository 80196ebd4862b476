//! Script discovery: find versioned `.cql` files in a directory and order them.
//!
//! Version numbers live in the file names (`V001__create_users.cql`). All
//! knowledge of that layout is kept in [`NamingScheme`]; the rest of the
//! system only sees [`MigrationScript`] values with a parsed [`Version`].

use crate::error::{CoreError, CoreResult};
use crate::script::{MigrationScript, Version};
use regex::Regex;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Widest version field accepted; keeps every version inside a `u32`/CQL `int`.
const MAX_VERSION_WIDTH: usize = 9;

/// File naming convention for migration scripts.
///
/// A matching name is `<prefix><digits><separator><anything>.<extension>` with
/// exactly `width` digits. Because every version is zero-padded to the same
/// width, sorting names lexicographically sorts them by version.
#[derive(Debug, Clone)]
pub struct NamingScheme {
    prefix: String,
    width: usize,
    separator: String,
    extension: String,
    pattern: Regex,
}

impl NamingScheme {
    /// Build a naming scheme, validating the parts.
    pub fn new(
        prefix: impl Into<String>,
        width: usize,
        separator: impl Into<String>,
        extension: impl Into<String>,
    ) -> CoreResult<Self> {
        let prefix = prefix.into();
        let separator = separator.into();
        let extension = extension.into();
        if prefix.is_empty() {
            return Err(CoreError::NamingScheme {
                message: "prefix must not be empty".to_string(),
            });
        }
        if width == 0 || width > MAX_VERSION_WIDTH {
            return Err(CoreError::NamingScheme {
                message: format!(
                    "version width must be between 1 and {MAX_VERSION_WIDTH}, got {width}"
                ),
            });
        }
        if extension.is_empty() {
            return Err(CoreError::NamingScheme {
                message: "extension must not be empty".to_string(),
            });
        }
        let pattern = Regex::new(&format!(
            r"^{}[0-9]{{{}}}{}.*\.{}$",
            regex::escape(&prefix),
            width,
            regex::escape(&separator),
            regex::escape(&extension),
        ))
        .map_err(|e| CoreError::NamingScheme {
            message: e.to_string(),
        })?;
        Ok(Self {
            prefix,
            width,
            separator,
            extension,
            pattern,
        })
    }

    /// Whether `file_name` follows this scheme.
    pub fn matches(&self, file_name: &str) -> bool {
        self.pattern.is_match(file_name)
    }

    /// Parse the version at its fixed position right after the prefix.
    ///
    /// Does not check the rest of the name; call [`matches`](Self::matches) first.
    pub fn extract_version(&self, file_name: &str) -> CoreResult<Version> {
        let start = self.prefix.len();
        let digits = file_name.get(start..start + self.width).unwrap_or_default();
        let well_formed = digits.len() == self.width && digits.bytes().all(|b| b.is_ascii_digit());
        let parsed = if well_formed {
            digits.parse::<u32>().ok()
        } else {
            None
        };
        parsed.map(Version::new).ok_or_else(|| CoreError::ScriptVersion {
            file: file_name.to_string(),
            found: digits.to_string(),
        })
    }

    /// Render the file name this scheme expects for `version` and `description`.
    pub fn file_name(&self, version: Version, description: &str) -> String {
        format!(
            "{}{:0width$}{}{}.{}",
            self.prefix,
            version.get(),
            self.separator,
            description,
            self.extension,
            width = self.width
        )
    }
}

impl Default for NamingScheme {
    /// `V###__<description>.cql`
    fn default() -> Self {
        NamingScheme::new("V", 3, "__", "cql").expect("default naming scheme is valid")
    }
}

/// Discovers migration scripts in one directory.
#[derive(Debug, Clone)]
pub struct ScriptRepository {
    dir: PathBuf,
    naming: NamingScheme,
}

impl ScriptRepository {
    /// Repository over `dir` using the default `V###__*.cql` scheme.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            naming: NamingScheme::default(),
        }
    }

    /// Replace the naming scheme.
    pub fn with_naming(mut self, naming: NamingScheme) -> Self {
        self.naming = naming;
        self
    }

    /// Directory scanned by [`discover`](Self::discover).
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List, parse, and order every script in the directory.
    ///
    /// Names that do not follow the naming scheme are skipped. A missing or
    /// empty directory yields an empty list.
    pub fn discover(&self) -> CoreResult<Vec<MigrationScript>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("Script directory {} does not exist", self.dir.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(CoreError::ScriptDirectory {
                    path: self.dir.display().to_string(),
                    source: e,
                })
            }
        };

        let mut candidates: Vec<(String, PathBuf)> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::ScriptDirectory {
                path: self.dir.display().to_string(),
                source: e,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !self.naming.matches(file_name) {
                log::debug!("Ignoring {file_name}: not a migration script name");
                continue;
            }
            candidates.push((file_name.to_string(), path));
        }
        candidates.sort_by(|a, b| a.0.cmp(&b.0));

        let mut scripts = Vec::with_capacity(candidates.len());
        for (file_name, path) in candidates {
            let version = self.naming.extract_version(&file_name)?;
            let contents = std::fs::read_to_string(&path).map_err(|e| CoreError::ScriptRead {
                path: path.display().to_string(),
                source: e,
            })?;
            scripts.push(MigrationScript::new(version, file_name, path, &contents));
        }

        warn_suspicious_versions(&scripts);
        Ok(scripts)
    }
}

/// Log scripts that will never run or that share a version with a neighbour.
fn warn_suspicious_versions(scripts: &[MigrationScript]) {
    for script in scripts.iter().filter(|s| s.version() == Version::NONE) {
        log::warn!(
            "{} has version 0, which is the empty-ledger marker; it will never be applied",
            script.name()
        );
    }
    for pair in scripts.windows(2) {
        if pair[0].version() == pair[1].version() {
            log::warn!(
                "{} and {} share version {}; both are applied in name order",
                pair[0].name(),
                pair[1].name(),
                pair[1].version()
            );
        }
    }
}

#[cfg(test)]
#[path = "repository_test.rs"]
mod tests;
