//! Migration ledger: the table recording which scripts have been applied.

use crate::error::{MigrateError, MigrateResult};
use crate::executor::StatementExecutor;
use crate::queries::QueryBuilder;
use cm_core::{MigrationScript, Version};
use cm_db::{DbResult, Row};
use serde::Serialize;

/// One ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMigration {
    pub version: Version,
    pub name: String,
    /// Recorded script checksum; `None` unless checksums are enabled, and for
    /// rows written before they were
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Reads and appends ledger rows.
///
/// Rows are only ever added, one per applied script, after every statement
/// of that script has succeeded.
#[derive(Clone)]
pub struct LedgerStore<'a> {
    executor: StatementExecutor<'a>,
    queries: QueryBuilder,
}

impl<'a> LedgerStore<'a> {
    pub fn new(executor: StatementExecutor<'a>, queries: QueryBuilder) -> Self {
        Self { executor, queries }
    }

    pub fn executor(&self) -> StatementExecutor<'a> {
        self.executor
    }

    pub fn queries(&self) -> &QueryBuilder {
        &self.queries
    }

    /// Whether the keyspace holding the ledger exists.
    ///
    /// Errors are left to the caller, which knows whether this is part of
    /// bootstrap or a read-only status check.
    pub async fn keyspace_exists(&self) -> DbResult<bool> {
        let result = self.executor.execute(self.queries.keyspace_exists()).await?;
        Ok(!result.rows().is_empty())
    }

    /// Every ledger row, sorted by version.
    pub async fn applied(&self) -> MigrateResult<Vec<AppliedMigration>> {
        let result = self
            .executor
            .execute(self.queries.select_applied())
            .await
            .map_err(|source| MigrateError::LedgerRead {
                table: self.queries.qualified_table(),
                source,
            })?;

        let mut applied = result
            .rows()
            .iter()
            .map(|row| self.parse_row(row))
            .collect::<MigrateResult<Vec<_>>>()?;
        applied.sort_by_key(|m| m.version);
        Ok(applied)
    }

    /// Append a row for a script whose statements all succeeded, returning
    /// the row as written.
    pub async fn record(&self, script: &MigrationScript) -> MigrateResult<AppliedMigration> {
        let ver = i32::try_from(script.version().get()).map_err(|_| MigrateError::LedgerWrite {
            script: script.name().to_string(),
            table: self.queries.qualified_table(),
            message: format!("version {} does not fit the ledger ver column", script.version()),
        })?;

        self.executor
            .execute(self.queries.insert_applied(ver, script))
            .await
            .map_err(|e| MigrateError::LedgerWrite {
                script: script.name().to_string(),
                table: self.queries.qualified_table(),
                message: e.to_string(),
            })?;

        log::debug!(
            "Recorded {} ({}) in {}",
            script.name(),
            script.version(),
            self.queries.qualified_table()
        );
        Ok(AppliedMigration {
            version: script.version(),
            name: script.name().to_string(),
            checksum: self
                .queries
                .checksums()
                .then(|| script.checksum().to_string()),
        })
    }

    fn parse_row(&self, row: &Row) -> MigrateResult<AppliedMigration> {
        let malformed = |message: String| MigrateError::LedgerRow {
            table: self.queries.qualified_table(),
            message,
        };

        let ver = row
            .get_int(0)
            .ok_or_else(|| malformed(format!("ver is not an integer: {:?}", row.get(0))))?;
        let ver = u32::try_from(ver).map_err(|_| malformed(format!("ver {ver} is negative")))?;
        let name = row.get_text(1).unwrap_or_default().to_string();
        let checksum = if self.queries.checksums() {
            row.get_text(2).map(str::to_string)
        } else {
            None
        };

        Ok(AppliedMigration {
            version: Version::new(ver),
            name,
            checksum,
        })
    }
}

/// Highest version in version-sorted ledger rows, or [`Version::NONE`] for an
/// empty ledger.
pub fn last_applied_version(applied: &[AppliedMigration]) -> Version {
    applied.last().map(|m| m.version).unwrap_or(Version::NONE)
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
