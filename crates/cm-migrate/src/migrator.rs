//! Migration orchestrator.
//!
//! Discovers scripts, bootstraps the keyspace, and applies every script newer
//! than the last ledger version, in order, recording each one after all of
//! its statements succeed. The first failure ends the run.
//!
//! With `verify_checksums` set, applied scripts are checked against the
//! checksums in the ledger before anything new runs.

use crate::bootstrap::KeyspaceBootstrapper;
use crate::error::{MigrateError, MigrateResult};
use crate::executor::StatementExecutor;
use crate::ledger::{last_applied_version, AppliedMigration, LedgerStore};
use crate::queries::QueryBuilder;
use crate::report::{MigrationReport, MigrationStatus};
use cm_core::{Config, MigrationScript, NamingScheme, ScriptRepository, Version};
use cm_db::{Session, Statement};

/// Owns the session for one run and releases it when the run ends.
pub struct Migrator {
    session: Box<dyn Session>,
    config: Config,
    naming: NamingScheme,
}

impl Migrator {
    pub fn new(session: Box<dyn Session>, config: Config) -> Self {
        Self {
            session,
            config,
            naming: NamingScheme::default(),
        }
    }

    /// Use a non-default script naming scheme.
    pub fn with_naming(mut self, naming: NamingScheme) -> Self {
        self.naming = naming;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Apply all pending scripts, then close the session.
    pub async fn run(self) -> MigrateResult<MigrationReport> {
        let outcome = self.migrate().await;
        self.finish(outcome).await
    }

    /// Report applied and pending scripts without changing anything, then
    /// close the session.
    pub async fn status(self) -> MigrateResult<MigrationStatus> {
        let outcome = self.inspect().await;
        self.finish(outcome).await
    }

    async fn migrate(&self) -> MigrateResult<MigrationReport> {
        let scripts = self.discover()?;
        if scripts.is_empty() {
            log::info!("No cql files to migrate in {}", self.config.cql_dir.display());
            return Ok(MigrationReport::nothing_discovered());
        }
        let discovered = scripts.len();

        let ledger = self.ledger();
        let action = KeyspaceBootstrapper::new(&ledger, &self.config.replication)
            .ensure(self.config.refresh)
            .await?;

        let recorded = ledger.applied().await?;
        if let Some(script) = modified_scripts(&scripts, &recorded).into_iter().next() {
            return Err(MigrateError::ScriptModified {
                script,
                table: ledger.queries().qualified_table(),
            });
        }
        let completed = last_applied_version(&recorded);
        let pending = pending_scripts(scripts, completed);
        log_pending(&pending);

        let mut applied = Vec::with_capacity(pending.len());
        for script in &pending {
            applied.push(self.apply(&ledger, script).await?);
        }

        Ok(MigrationReport {
            discovered,
            keyspace: Some(action),
            previous_version: completed,
            applied,
        })
    }

    async fn inspect(&self) -> MigrateResult<MigrationStatus> {
        let scripts = self.discover()?;
        let ledger = self.ledger();

        let keyspace_present = ledger.keyspace_exists().await.map_err(|source| {
            MigrateError::LedgerRead {
                table: ledger.queries().qualified_table(),
                source,
            }
        })?;
        let applied = if keyspace_present {
            ledger.applied().await?
        } else {
            Vec::new()
        };
        let last_applied = last_applied_version(&applied);
        let modified = modified_scripts(&scripts, &applied);

        Ok(MigrationStatus {
            keyspace: self.config.keyspace.to_string(),
            keyspace_present,
            last_applied,
            applied,
            pending: pending_scripts(scripts, last_applied),
            modified,
        })
    }

    /// Execute every statement of a script, then record it.
    async fn apply(
        &self,
        ledger: &LedgerStore<'_>,
        script: &MigrationScript,
    ) -> MigrateResult<AppliedMigration> {
        log::info!("Executing cql file {}", script.name());
        let executor = ledger.executor();
        for statement in script.statements() {
            log::debug!(
                "Executing cql statement (from {}):\n\n{}\n",
                script.name(),
                statement
            );
            executor
                .execute(Statement::execute(statement.as_str()))
                .await
                .map_err(|source| MigrateError::Script {
                    script: script.name().to_string(),
                    source,
                })?;
        }
        ledger.record(script).await
    }

    fn discover(&self) -> MigrateResult<Vec<MigrationScript>> {
        let repository =
            ScriptRepository::new(&self.config.cql_dir).with_naming(self.naming.clone());
        Ok(repository.discover()?)
    }

    fn ledger(&self) -> LedgerStore<'_> {
        let executor = StatementExecutor::new(&*self.session, self.config.statement_timeout);
        let queries = QueryBuilder::new(
            executor.dialect(),
            self.config.keyspace.clone(),
            self.config.table.clone(),
        )
        .with_checksums(self.config.verify_checksums);
        LedgerStore::new(executor, queries)
    }

    /// Close the session, keeping the run's own error if both fail.
    async fn finish<T>(self, outcome: MigrateResult<T>) -> MigrateResult<T> {
        let closed = self.session.close().await;
        match (outcome, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(MigrateError::Close(e)),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                log::warn!("Failed to close database session: {close_err}");
                Err(e)
            }
        }
    }
}

/// Scripts strictly newer than `completed`, keeping discovery order.
pub fn pending_scripts(scripts: Vec<MigrationScript>, completed: Version) -> Vec<MigrationScript> {
    scripts
        .into_iter()
        .filter(|script| script.version() > completed)
        .collect()
}

/// Names of applied scripts whose discovered file has a different checksum
/// than the one recorded, in version order.
///
/// Rows without a recorded checksum and scripts no longer on disk are not
/// checked.
fn modified_scripts(scripts: &[MigrationScript], recorded: &[AppliedMigration]) -> Vec<String> {
    recorded
        .iter()
        .filter_map(|row| {
            let expected = row.checksum.as_deref()?;
            let script = scripts.iter().find(|s| s.name() == row.name)?;
            (script.checksum() != expected).then(|| {
                log::warn!(
                    "{} changed since it was applied (recorded {expected}, found {})",
                    row.name,
                    script.checksum()
                );
                row.name.clone()
            })
        })
        .collect()
}

fn log_pending(pending: &[MigrationScript]) {
    match pending {
        [] => log::info!("No new cql files to migrate"),
        [script] => log::info!("New cql file to migrate: {script}"),
        scripts => log::info!(
            "New cql files to migrate: {}",
            scripts
                .iter()
                .map(MigrationScript::name)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
