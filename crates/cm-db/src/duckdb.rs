//! DuckDB session implementation
//!
//! A keyspace is a DuckDB schema. Each statement runs on tokio's blocking
//! pool so the caller's timeout can fire while DuckDB is busy. A statement
//! that overruns is stopped through the connection's interrupt handle; until
//! DuckDB acknowledges the interrupt the connection stays locked.

use crate::error::{DbError, DbResult};
use crate::row_helpers::to_row;
use crate::statement::{QueryResult, Statement, StatementKind, Value};
use crate::traits::{Dialect, Session};
use ::duckdb::types::Value as DuckValue;
use ::duckdb::{AccessMode, Config, Connection, InterruptHandle};
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// DuckDB database session
pub struct DuckDbSession {
    conn: Arc<Mutex<Option<Connection>>>,
    /// Usable without taking the lock, which a running statement holds.
    interrupt: Arc<InterruptHandle>,
}

impl DuckDbSession {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self::from_connection(conn))
    }

    /// Open an existing database file without write access.
    ///
    /// Unlike [`from_path`](Self::from_path) this never creates the file; a
    /// missing file is a connection error.
    pub fn read_only(path: &Path) -> DbResult<Self> {
        let config = Config::default()
            .access_mode(AccessMode::ReadOnly)
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        let conn = Connection::open_with_flags(path, config)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self::from_connection(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn from_connection(conn: Connection) -> Self {
        let interrupt = conn.interrupt_handle();
        Self {
            conn: Arc::new(Mutex::new(Some(conn))),
            interrupt,
        }
    }

    /// Run `f` against the open connection on the blocking pool.
    async fn with_connection<T, F>(&self, f: F) -> DbResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Option<Connection>) -> DbResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|e| DbError::MutexPoisoned(e.to_string()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| DbError::Internal(format!("blocking task failed: {e}")))?
    }
}

fn to_duckdb_value(value: &Value) -> DuckValue {
    match value {
        Value::Int(v) => DuckValue::Int(*v),
        Value::BigInt(v) => DuckValue::BigInt(*v),
        Value::Text(v) => DuckValue::Text(v.clone()),
        Value::Bool(v) => DuckValue::Boolean(*v),
        Value::Uuid(v) => DuckValue::Text(v.to_string()),
    }
}

/// Execute a statement synchronously
fn execute_sync(conn: &Connection, statement: &Statement) -> DbResult<QueryResult> {
    let sql = statement.text();
    let params: Vec<DuckValue> = statement.values().iter().map(to_duckdb_value).collect();
    let mut stmt = conn.prepare(sql).map_err(|e| DbError::execution(sql, e))?;

    match statement.kind() {
        StatementKind::Execute => {
            stmt.execute(::duckdb::params_from_iter(params))
                .map_err(|e| DbError::execution(sql, e))?;
            Ok(QueryResult::applied(Vec::new()))
        }
        StatementKind::Query => {
            let rows = stmt
                .query_map(::duckdb::params_from_iter(params), |row| Ok(to_row(row)))
                .map_err(|e| DbError::execution(sql, e))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| DbError::execution(sql, e))?;
            Ok(QueryResult::applied(rows))
        }
    }
}

#[async_trait]
impl Session for DuckDbSession {
    async fn execute(&self, statement: &Statement) -> DbResult<QueryResult> {
        let statement = statement.clone();
        self.with_connection(move |conn| {
            let conn = conn.as_ref().ok_or(DbError::SessionClosed)?;
            execute_sync(conn, &statement)
        })
        .await
    }

    fn dialect(&self) -> Dialect {
        Dialect::DuckDb
    }

    fn backend_name(&self) -> &'static str {
        "duckdb"
    }

    fn cancel(&self) {
        log::debug!("Interrupting running DuckDB statement");
        self.interrupt.interrupt();
    }

    async fn close(&self) -> DbResult<()> {
        self.with_connection(|conn| match conn.take() {
            Some(c) => c
                .close()
                .map_err(|(_, e)| DbError::CloseError(e.to_string())),
            None => Ok(()),
        })
        .await
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
