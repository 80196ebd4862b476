//! Session trait definition

use crate::error::DbResult;
use crate::statement::{QueryResult, Statement};
use async_trait::async_trait;

/// Statement dialect spoken by a session.
///
/// The query builder in `cm-migrate` renders keyspace, catalog, and ledger
/// statements per dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Cassandra Query Language
    Cql,
    /// DuckDB SQL; a keyspace maps to a schema
    DuckDb,
}

/// A connection to the migration target.
///
/// Implementations must be Send + Sync for async operation. Statements are
/// issued one at a time; callers never run two concurrently.
#[async_trait]
pub trait Session: Send + Sync {
    /// Execute one statement and report whether it was applied.
    async fn execute(&self, statement: &Statement) -> DbResult<QueryResult>;

    /// Dialect used to build statements for this session
    fn dialect(&self) -> Dialect;

    /// Backend identifier for logging
    fn backend_name(&self) -> &'static str;

    /// Abort the statement currently running, if any.
    ///
    /// Called when a statement overruns its timeout, so the session is free
    /// again by the time the caller sees the error. The default does nothing.
    fn cancel(&self) {}

    /// Release the underlying connection. Later calls to `execute` fail.
    async fn close(&self) -> DbResult<()>;
}
