//! cm-migrate - Migration engine for cqlmigrate
//!
//! Applies versioned scripts to a keyspace exactly once, in version order:
//! discover scripts, make sure the keyspace and ledger table exist, read the
//! last applied version from the ledger, then execute and record each pending
//! script, stopping at the first failure.

pub mod bootstrap;
pub mod error;
pub mod executor;
pub mod ledger;
pub mod migrator;
pub mod queries;
pub mod report;

pub use bootstrap::{KeyspaceAction, KeyspaceBootstrapper};
pub use error::{MigrateError, MigrateResult};
pub use executor::StatementExecutor;
pub use ledger::{last_applied_version, AppliedMigration, LedgerStore};
pub use migrator::{pending_scripts, Migrator};
pub use queries::QueryBuilder;
pub use report::{MigrationReport, MigrationStatus};
