//! cm-db - Database session layer for cqlmigrate
//!
//! This crate provides the [`Session`] trait, the statement and result types
//! that cross it, a DuckDB session, an optional Cassandra session (behind the
//! `cassandra` feature), and [`connect`] / [`connect_read_only`] to open
//! whichever one the configuration selects.

#[cfg(feature = "cassandra")]
pub mod cassandra;
pub mod connect;
pub mod duckdb;
pub mod error;
pub(crate) mod row_helpers;
pub mod statement;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

#[cfg(feature = "cassandra")]
pub use cassandra::CassandraSession;
pub use connect::{connect, connect_read_only};
pub use self::duckdb::DuckDbSession;
pub use error::{DbError, DbResult};
pub use statement::{Cell, QueryResult, Row, Statement, StatementKind, Value};
pub use traits::{Dialect, Session};
