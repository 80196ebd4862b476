//! Error types for cm-core

use thiserror::Error;

/// Core error type for cqlmigrate
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Required configuration value missing
    #[error("[C001] Missing required config '{key}': set {env} or '{key}' in the config file")]
    ConfigMissing { key: &'static str, env: &'static str },

    /// C002: Configuration value present but malformed
    #[error("[C002] Invalid config '{key}': {message}")]
    ConfigInvalid { key: &'static str, message: String },

    /// C003: Configuration file not found
    #[error("[C003] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C004: Configuration file could not be parsed
    #[error("[C004] Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: String,
        source: serde_yaml::Error,
    },

    /// C005: Keyspace or table name is not a plain identifier
    #[error("[C005] Invalid {kind} name '{name}': {reason}")]
    InvalidIdentifier {
        kind: &'static str,
        name: String,
        reason: &'static str,
    },

    /// S001: Script name matched the naming scheme but its version is not numeric
    #[error("[S001] Cannot parse version of script {file}: '{found}' is not a number")]
    ScriptVersion { file: String, found: String },

    /// S002: Script directory could not be listed
    #[error("[S002] Failed to list script directory '{path}': {source}")]
    ScriptDirectory {
        path: String,
        source: std::io::Error,
    },

    /// S003: Script file could not be read
    #[error("[S003] Failed to read script '{path}': {source}")]
    ScriptRead {
        path: String,
        source: std::io::Error,
    },

    /// S004: Invalid naming scheme
    #[error("[S004] Invalid script naming scheme: {message}")]
    NamingScheme { message: String },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
