//! Error types for cm-migrate

use cm_core::CoreError;
use cm_db::DbError;
use thiserror::Error;

/// Migration run errors
///
/// Every variant is fatal: the run stops where the error occurred and nothing
/// is retried or rolled back.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// M001: Could not connect to the database
    #[error("[M001] Unable to connect to the database: {0}")]
    Connection(#[source] DbError),

    /// M002: Script discovery or parsing failed
    #[error("[M002] Script discovery failed: {0}")]
    Discovery(#[from] CoreError),

    /// M003: Keyspace or ledger table could not be prepared
    #[error("[M003] Failed to prepare keyspace {keyspace}: {source}")]
    Bootstrap { keyspace: String, source: DbError },

    /// M004: A statement of a script failed
    #[error("[M004] Failed executing cql file {script}: {source}")]
    Script { script: String, source: DbError },

    /// M005: Ledger could not be read
    #[error("[M005] Failed to read migration ledger {table}: {source}")]
    LedgerRead { table: String, source: DbError },

    /// M006: Applied script could not be recorded
    #[error("[M006] Failed to record {script} in migration ledger {table}: {message}")]
    LedgerWrite {
        script: String,
        table: String,
        message: String,
    },

    /// M007: Ledger row has an unusable version
    #[error("[M007] Malformed row in migration ledger {table}: {message}")]
    LedgerRow { table: String, message: String },

    /// M008: Session could not be closed after the run
    #[error("[M008] Failed to close database session: {0}")]
    Close(#[source] DbError),

    /// M009: An applied script's file no longer matches its recorded checksum
    #[error(
        "[M009] Previously migrated file '{script}' has been modified: its contents no longer \
         match the checksum recorded in {table}"
    )]
    ScriptModified { script: String, table: String },
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;
