//! cm-core - Core library for cqlmigrate
//!
//! This crate provides the shared configuration, validated keyspace/table
//! identifiers, the migration script entity, and the script repository that
//! discovers and orders versioned `.cql` files.

pub mod checksum;
pub mod config;
pub mod error;
pub mod identifier;
pub mod repository;
pub mod script;

pub use checksum::compute_checksum;
pub use config::{
    Backend, Config, ConfigKey, DatabaseConfig, RawConfig, RawDatabaseConfig, Replication,
};
pub use error::{CoreError, CoreResult};
pub use identifier::{KeyspaceName, TableName};
pub use repository::{NamingScheme, ScriptRepository};
pub use script::{split_statements, MigrationScript, Version};
