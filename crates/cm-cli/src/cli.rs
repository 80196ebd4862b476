//! CLI argument definitions using clap derive API

use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use cm_core::{RawConfig, RawDatabaseConfig};
use std::path::PathBuf;

/// cqlmigrate - apply versioned CQL scripts to a keyspace exactly once
#[derive(Parser, Debug)]
#[command(name = "cqlmigrate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
///
/// Every configuration flag falls back to its `CQLMIGRATE_*` environment
/// variable, then to the `--config` file, then to the built-in default.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// YAML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database backend (duckdb or cassandra)
    #[arg(long, global = true, env = "CQLMIGRATE_BACKEND")]
    pub backend: Option<String>,

    /// DuckDB database file, or :memory:
    #[arg(long, global = true, env = "CQLMIGRATE_DATABASE_PATH")]
    pub database_path: Option<String>,

    /// Cassandra contact point host
    #[arg(long, global = true, env = "CQLMIGRATE_HOST")]
    pub host: Option<String>,

    /// Cassandra contact point port
    #[arg(long, global = true, env = "CQLMIGRATE_PORT")]
    pub port: Option<u16>,

    /// Directory holding V###__*.cql scripts
    #[arg(long, global = true, env = "CQLMIGRATE_CQL_DIR")]
    pub cql_dir: Option<PathBuf>,

    /// Keyspace to migrate
    #[arg(short, long, global = true, env = "CQLMIGRATE_KEYSPACE")]
    pub keyspace: Option<String>,

    /// Ledger table recording applied scripts
    #[arg(long, global = true, env = "CQLMIGRATE_TABLE")]
    pub table: Option<String>,

    /// Drop and recreate the keyspace before migrating (--refresh=false to disable)
    #[arg(
        long,
        global = true,
        env = "CQLMIGRATE_REFRESH",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub refresh: Option<bool>,

    /// Never refresh, even if the config file or environment asks for it
    #[arg(long, global = true)]
    pub no_refresh: bool,

    /// Record script checksums and fail if an applied script was edited
    #[arg(
        long,
        global = true,
        env = "CQLMIGRATE_VERIFY_CHECKSUMS",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub verify_checksums: Option<bool>,

    /// Per-statement timeout in seconds
    #[arg(long, global = true, env = "CQLMIGRATE_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl GlobalArgs {
    /// Flag and environment values as the highest-precedence config layer.
    ///
    /// Unset boolean flags leave the lower layers in charge; `--no-refresh`
    /// wins over any `--refresh` value.
    pub fn to_raw(&self) -> RawConfig {
        let database = (self.backend.is_some()
            || self.database_path.is_some()
            || self.host.is_some()
            || self.port.is_some())
        .then(|| RawDatabaseConfig {
            backend: self.backend.clone(),
            path: self.database_path.clone(),
            host: self.host.clone(),
            port: self.port,
        });

        RawConfig {
            database,
            cql_dir: self.cql_dir.clone(),
            keyspace: self.keyspace.clone(),
            table: self.table.clone(),
            refresh: if self.no_refresh {
                Some(false)
            } else {
                self.refresh
            },
            verify_checksums: self.verify_checksums,
            statement_timeout_secs: self.timeout_secs,
            replication: None,
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending scripts to the keyspace
    Migrate(MigrateArgs),

    /// Show applied and pending scripts without changing anything
    Status(StatusArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Report output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
