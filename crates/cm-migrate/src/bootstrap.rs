//! Keyspace and ledger table bootstrap.

use crate::error::{MigrateError, MigrateResult};
use crate::ledger::LedgerStore;
use cm_core::Replication;
use cm_db::{DbError, Statement};
use serde::Serialize;

/// What bootstrap did to the keyspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyspaceAction {
    /// Keyspace already existed and was left alone
    Unchanged,
    /// Keyspace was absent and has been created with its ledger table
    Created,
    /// Keyspace existed and was dropped and created again (refresh)
    Recreated,
}

impl std::fmt::Display for KeyspaceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyspaceAction::Unchanged => write!(f, "unchanged"),
            KeyspaceAction::Created => write!(f, "created"),
            KeyspaceAction::Recreated => write!(f, "recreated"),
        }
    }
}

/// Makes sure the keyspace and its ledger table exist before any script runs.
pub struct KeyspaceBootstrapper<'s, 'a> {
    ledger: &'s LedgerStore<'a>,
    replication: &'s Replication,
}

impl<'s, 'a> KeyspaceBootstrapper<'s, 'a> {
    pub fn new(ledger: &'s LedgerStore<'a>, replication: &'s Replication) -> Self {
        Self {
            ledger,
            replication,
        }
    }

    /// Ensure the keyspace exists, dropping it first when `refresh` is set.
    ///
    /// The ledger table is only created together with the keyspace; a
    /// present keyspace is assumed to already hold it.
    pub async fn ensure(&self, refresh: bool) -> MigrateResult<KeyspaceAction> {
        let queries = self.ledger.queries();
        let keyspace = queries.keyspace();

        let present = self
            .ledger
            .keyspace_exists()
            .await
            .map_err(|e| self.failed(e))?;

        if present && !refresh {
            log::debug!("Keyspace {keyspace} already exists");
            return Ok(KeyspaceAction::Unchanged);
        }

        if present {
            log::info!("Refresh requested, dropping keyspace {keyspace}");
            self.run(queries.drop_keyspace()).await?;
        }

        log::info!("Creating keyspace {keyspace}");
        self.run(queries.create_keyspace(self.replication)).await?;
        log::info!("Creating migration ledger {}", queries.qualified_table());
        self.run(queries.create_ledger_table()).await?;

        Ok(if present {
            KeyspaceAction::Recreated
        } else {
            KeyspaceAction::Created
        })
    }

    async fn run(&self, statement: Statement) -> MigrateResult<()> {
        self.ledger
            .executor()
            .execute(statement)
            .await
            .map(|_| ())
            .map_err(|e| self.failed(e))
    }

    fn failed(&self, source: DbError) -> MigrateError {
        MigrateError::Bootstrap {
            keyspace: self.ledger.queries().keyspace().to_string(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod tests;
