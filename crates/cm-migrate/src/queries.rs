//! Keyspace and ledger statements, rendered per dialect.
//!
//! Keyspace and table names are validated identifiers and are spliced into
//! the statement text; everything else is bound as a parameter.
//!
//! With checksums enabled the ledger carries a fourth `checksum` column
//! holding the SHA-256 of each applied script file.

use cm_core::{KeyspaceName, MigrationScript, Replication, TableName};
use cm_db::{Dialect, Statement};
use uuid::Uuid;

/// Builds the fixed set of statements the migrator issues against one
/// keyspace and ledger table.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    dialect: Dialect,
    keyspace: KeyspaceName,
    table: TableName,
    checksums: bool,
}

impl QueryBuilder {
    pub fn new(dialect: Dialect, keyspace: KeyspaceName, table: TableName) -> Self {
        Self {
            dialect,
            keyspace,
            table,
            checksums: false,
        }
    }

    /// Include the `checksum` column in the ledger statements.
    pub fn with_checksums(mut self, enabled: bool) -> Self {
        self.checksums = enabled;
        self
    }

    pub fn checksums(&self) -> bool {
        self.checksums
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn keyspace(&self) -> &KeyspaceName {
        &self.keyspace
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// Fully qualified ledger table name, `keyspace.table`.
    pub fn qualified_table(&self) -> String {
        format!("{}.{}", self.keyspace, self.table)
    }

    /// Lists the tables of the keyspace; an empty result means the keyspace
    /// does not exist.
    pub fn keyspace_exists(&self) -> Statement {
        let text = match self.dialect {
            Dialect::Cql => "SELECT table_name FROM system_schema.tables WHERE keyspace_name = ?",
            Dialect::DuckDb => {
                "SELECT table_name FROM information_schema.tables WHERE table_schema = ?"
            }
        };
        Statement::query(text).bind(self.keyspace.as_str())
    }

    /// Drops the keyspace and everything in it.
    pub fn drop_keyspace(&self) -> Statement {
        let text = match self.dialect {
            Dialect::Cql => format!("DROP KEYSPACE {}", self.keyspace),
            Dialect::DuckDb => format!("DROP SCHEMA {} CASCADE", self.keyspace),
        };
        Statement::execute(text)
    }

    /// Creates the keyspace. Fails if it already exists.
    ///
    /// Replication only applies to CQL; DuckDB schemas have none.
    pub fn create_keyspace(&self, replication: &Replication) -> Statement {
        let text = match self.dialect {
            Dialect::Cql => format!(
                "CREATE KEYSPACE {} WITH replication = {}",
                self.keyspace,
                replication_map(replication)
            ),
            Dialect::DuckDb => format!("CREATE SCHEMA {}", self.keyspace),
        };
        Statement::execute(text)
    }

    /// Creates the ledger table. Fails if it already exists.
    pub fn create_ledger_table(&self) -> Statement {
        let (columns, checksum) = match self.dialect {
            Dialect::Cql => (
                "id timeuuid PRIMARY KEY, ver int, name varchar",
                ", checksum varchar",
            ),
            Dialect::DuckDb => (
                "id UUID PRIMARY KEY, ver INTEGER, name VARCHAR",
                ", checksum VARCHAR",
            ),
        };
        let checksum = if self.checksums { checksum } else { "" };
        Statement::execute(format!(
            "CREATE TABLE {} ({columns}{checksum})",
            self.qualified_table()
        ))
    }

    /// Reads every ledger row as `(ver, name)`, or `(ver, name, checksum)`
    /// with checksums enabled.
    pub fn select_applied(&self) -> Statement {
        let columns = if self.checksums {
            "ver, name, checksum"
        } else {
            "ver, name"
        };
        Statement::query(format!("SELECT {columns} FROM {}", self.qualified_table()))
    }

    /// Records one applied script under a fresh time-ordered id.
    ///
    /// CQL generates the id server-side with `now()`; DuckDB gets a UUIDv7
    /// bound as text.
    pub fn insert_applied(&self, version: i32, script: &MigrationScript) -> Statement {
        let (columns, values) = if self.checksums {
            ("id, ver, name, checksum", "?, ?, ?")
        } else {
            ("id, ver, name", "?, ?")
        };
        let statement = match self.dialect {
            Dialect::Cql => Statement::execute(format!(
                "INSERT INTO {} ({columns}) VALUES (now(), {values})",
                self.qualified_table()
            )),
            Dialect::DuckDb => Statement::execute(format!(
                "INSERT INTO {} ({columns}) VALUES (CAST(? AS UUID), {values})",
                self.qualified_table()
            ))
            .bind(Uuid::now_v7()),
        };
        let statement = statement.bind(version).bind(script.name());
        if self.checksums {
            statement.bind(script.checksum())
        } else {
            statement
        }
    }
}

/// Render a replication setting as a CQL map literal.
fn replication_map(replication: &Replication) -> String {
    match replication {
        Replication::SimpleStrategy { replication_factor } => format!(
            "{{'class': 'SimpleStrategy', 'replication_factor': {replication_factor}}}"
        ),
        Replication::NetworkTopologyStrategy { datacenters } => {
            let mut map = String::from("{'class': 'NetworkTopologyStrategy'");
            for (dc, factor) in datacenters {
                map.push_str(&format!(", '{dc}': {factor}"));
            }
            map.push('}');
            map
        }
    }
}

#[cfg(test)]
#[path = "queries_test.rs"]
mod tests;
