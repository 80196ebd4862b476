//! Configuration for a migration run.
//!
//! Values come from three layers, highest precedence first: command-line
//! flags / environment variables (both handled by the CLI), an optional YAML
//! file, and built-in defaults. Each layer is a [`RawConfig`]; layers are
//! stacked with [`RawConfig::overlay`] and turned into the immutable
//! [`Config`] once with [`Config::resolve`].

use crate::error::{CoreError, CoreResult};
use crate::identifier::{KeyspaceName, TableName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_DB_PATH: &str = "cqlmigrate.duckdb";
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 9042;
const DEFAULT_TABLE: &str = "migrated_cql";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// A configuration key, with the YAML key and environment variable it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Backend,
    DatabasePath,
    Host,
    Port,
    CqlDir,
    Keyspace,
    Table,
    Refresh,
    VerifyChecksums,
    StatementTimeout,
    Replication,
}

impl ConfigKey {
    /// Key as written in the YAML config file.
    pub fn name(self) -> &'static str {
        match self {
            ConfigKey::Backend => "database.backend",
            ConfigKey::DatabasePath => "database.path",
            ConfigKey::Host => "database.host",
            ConfigKey::Port => "database.port",
            ConfigKey::CqlDir => "cql_dir",
            ConfigKey::Keyspace => "keyspace",
            ConfigKey::Table => "table",
            ConfigKey::Refresh => "refresh",
            ConfigKey::VerifyChecksums => "verify_checksums",
            ConfigKey::StatementTimeout => "statement_timeout_secs",
            ConfigKey::Replication => "replication",
        }
    }

    /// Environment variable read by the CLI for this key.
    pub fn env_var(self) -> &'static str {
        match self {
            ConfigKey::Backend => "CQLMIGRATE_BACKEND",
            ConfigKey::DatabasePath => "CQLMIGRATE_DATABASE_PATH",
            ConfigKey::Host => "CQLMIGRATE_HOST",
            ConfigKey::Port => "CQLMIGRATE_PORT",
            ConfigKey::CqlDir => "CQLMIGRATE_CQL_DIR",
            ConfigKey::Keyspace => "CQLMIGRATE_KEYSPACE",
            ConfigKey::Table => "CQLMIGRATE_TABLE",
            ConfigKey::Refresh => "CQLMIGRATE_REFRESH",
            ConfigKey::VerifyChecksums => "CQLMIGRATE_VERIFY_CHECKSUMS",
            ConfigKey::StatementTimeout => "CQLMIGRATE_TIMEOUT_SECS",
            ConfigKey::Replication => "",
        }
    }

    fn missing(self) -> CoreError {
        CoreError::ConfigMissing {
            key: self.name(),
            env: self.env_var(),
        }
    }

    fn invalid(self, message: impl Into<String>) -> CoreError {
        CoreError::ConfigInvalid {
            key: self.name(),
            message: message.into(),
        }
    }
}

/// Database backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// DuckDB file or in-memory database (default)
    #[default]
    DuckDb,
    /// Apache Cassandra / ScyllaDB cluster
    Cassandra,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::DuckDb => write!(f, "duckdb"),
            Backend::Cassandra => write!(f, "cassandra"),
        }
    }
}

impl FromStr for Backend {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "duckdb" => Ok(Backend::DuckDb),
            "cassandra" | "scylla" => Ok(Backend::Cassandra),
            other => Err(ConfigKey::Backend.invalid(format!(
                "unknown backend '{other}', expected 'duckdb' or 'cassandra'"
            ))),
        }
    }
}

/// Keyspace replication used when the keyspace is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum Replication {
    /// Same replica count on every node; factor 1 is the single-node setup.
    SimpleStrategy { replication_factor: u8 },
    /// Per-datacenter replica counts.
    NetworkTopologyStrategy { datacenters: BTreeMap<String, u8> },
}

impl Default for Replication {
    fn default() -> Self {
        Replication::SimpleStrategy {
            replication_factor: 1,
        }
    }
}

impl Replication {
    fn validate(&self) -> CoreResult<()> {
        let key = ConfigKey::Replication;
        match self {
            Replication::SimpleStrategy { replication_factor } => {
                if *replication_factor == 0 {
                    return Err(key.invalid("replication_factor must be positive"));
                }
            }
            Replication::NetworkTopologyStrategy { datacenters } => {
                if datacenters.is_empty() {
                    return Err(
                        key.invalid("NetworkTopologyStrategy needs at least one datacenter")
                    );
                }
                for (dc, factor) in datacenters {
                    let valid_name = !dc.is_empty()
                        && dc
                            .chars()
                            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
                    if !valid_name {
                        return Err(key.invalid(format!("invalid datacenter name '{dc}'")));
                    }
                    if *factor == 0 {
                        return Err(key.invalid(format!(
                            "replication factor for datacenter {dc} must be positive"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Resolved database connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Which backend to connect to
    pub backend: Backend,
    /// DuckDB database file, or `:memory:`
    pub path: String,
    /// Cassandra contact point host
    pub host: String,
    /// Cassandra contact point port
    pub port: u16,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            path: DEFAULT_DB_PATH.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Immutable configuration for one migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Directory holding `V###__*.cql` scripts
    pub cql_dir: PathBuf,
    /// Keyspace migrations are applied to
    pub keyspace: KeyspaceName,
    /// Ledger table inside the keyspace
    pub table: TableName,
    /// Drop and recreate the keyspace before migrating
    pub refresh: bool,
    /// Record script checksums and reject applied scripts whose file changed
    pub verify_checksums: bool,
    /// Per-statement execution timeout
    pub statement_timeout: Duration,
    /// Replication for a newly created keyspace
    pub replication: Replication,
}

impl Config {
    /// Resolve a fully layered [`RawConfig`], applying defaults and validation.
    pub fn resolve(raw: RawConfig) -> CoreResult<Self> {
        let db = raw.database.unwrap_or_default();

        let backend = match db.backend {
            Some(b) => b.parse()?,
            None => Backend::default(),
        };
        let port = db.port.unwrap_or(DEFAULT_PORT);
        if port == 0 {
            return Err(ConfigKey::Port.invalid("port must be between 1 and 65535"));
        }
        let database = DatabaseConfig {
            backend,
            path: db.path.unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            host: db.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        };
        if database.path.is_empty() {
            return Err(ConfigKey::DatabasePath.invalid("path must not be empty"));
        }
        if database.host.is_empty() {
            return Err(ConfigKey::Host.invalid("host must not be empty"));
        }

        let cql_dir = raw.cql_dir.ok_or_else(|| ConfigKey::CqlDir.missing())?;
        let keyspace = raw.keyspace.ok_or_else(|| ConfigKey::Keyspace.missing())?;
        let keyspace = KeyspaceName::parse(keyspace)?;
        let table = TableName::parse(raw.table.as_deref().unwrap_or(DEFAULT_TABLE))?;

        let timeout_secs = raw.statement_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigKey::StatementTimeout.invalid("timeout must be at least 1 second"));
        }

        let replication = raw.replication.unwrap_or_default();
        replication.validate()?;

        Ok(Self {
            database,
            cql_dir,
            keyspace,
            table,
            refresh: raw.refresh.unwrap_or(false),
            verify_checksums: raw.verify_checksums.unwrap_or(false),
            statement_timeout: Duration::from_secs(timeout_secs),
            replication,
        })
    }
}

/// Database section of a [`RawConfig`] layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDatabaseConfig {
    #[serde(default)]
    pub backend: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

/// One configuration layer; every value is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    #[serde(default)]
    pub database: Option<RawDatabaseConfig>,
    #[serde(default)]
    pub cql_dir: Option<PathBuf>,
    #[serde(default)]
    pub keyspace: Option<String>,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub refresh: Option<bool>,
    #[serde(default)]
    pub verify_checksums: Option<bool>,
    #[serde(default)]
    pub statement_timeout_secs: Option<u64>,
    #[serde(default)]
    pub replication: Option<Replication>,
}

impl RawConfig {
    /// Load a YAML config file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::ConfigInvalid {
            key: "config",
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_yaml(&content).map_err(|source| CoreError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Parse a YAML document. An empty document is an empty layer.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Stack `higher` on top of `self`; values set in `higher` win.
    pub fn overlay(self, higher: RawConfig) -> RawConfig {
        let database = match (self.database, higher.database) {
            (Some(low), Some(high)) => Some(RawDatabaseConfig {
                backend: high.backend.or(low.backend),
                path: high.path.or(low.path),
                host: high.host.or(low.host),
                port: high.port.or(low.port),
            }),
            (low, high) => high.or(low),
        };
        RawConfig {
            database,
            cql_dir: higher.cql_dir.or(self.cql_dir),
            keyspace: higher.keyspace.or(self.keyspace),
            table: higher.table.or(self.table),
            refresh: higher.refresh.or(self.refresh),
            verify_checksums: higher.verify_checksums.or(self.verify_checksums),
            statement_timeout_secs: higher.statement_timeout_secs.or(self.statement_timeout_secs),
            replication: higher.replication.or(self.replication),
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
