//! Cassandra / ScyllaDB session implementation (`cassandra` feature)

use crate::error::{DbError, DbResult};
use crate::statement::{Cell, QueryResult, Row, Statement, Value};
use crate::traits::{Dialect, Session};
use async_trait::async_trait;
use scylla::frame::response::result::CqlValue;
use scylla::query::Query;
use tokio::sync::Mutex;

/// Name of the result column Cassandra adds to conditional (LWT) statements.
const APPLIED_COLUMN: &str = "[applied]";

/// Cassandra database session
pub struct CassandraSession {
    session: Mutex<Option<scylla::Session>>,
}

impl CassandraSession {
    /// Connect to a single contact point.
    pub async fn connect(host: &str, port: u16) -> DbResult<Self> {
        let node = format!("{host}:{port}");
        let session = scylla::SessionBuilder::new()
            .known_node(&node)
            .build()
            .await
            .map_err(|e| DbError::ConnectionError(format!("{node}: {e}")))?;
        Ok(Self {
            session: Mutex::new(Some(session)),
        })
    }
}

fn to_cql_value(value: &Value) -> CqlValue {
    match value {
        Value::Int(v) => CqlValue::Int(*v),
        Value::BigInt(v) => CqlValue::BigInt(*v),
        Value::Text(v) => CqlValue::Text(v.clone()),
        Value::Bool(v) => CqlValue::Boolean(*v),
        Value::Uuid(v) => CqlValue::Uuid(*v),
    }
}

fn to_cell(value: Option<CqlValue>) -> Cell {
    match value {
        None => Cell::Null,
        Some(CqlValue::Int(v)) => Cell::Int(i64::from(v)),
        Some(CqlValue::BigInt(v)) => Cell::Int(v),
        Some(CqlValue::SmallInt(v)) => Cell::Int(i64::from(v)),
        Some(CqlValue::TinyInt(v)) => Cell::Int(i64::from(v)),
        Some(CqlValue::Text(v)) | Some(CqlValue::Ascii(v)) => Cell::Text(v),
        Some(CqlValue::Boolean(v)) => Cell::Bool(v),
        Some(CqlValue::Double(v)) => Cell::Float(v),
        Some(CqlValue::Float(v)) => Cell::Float(f64::from(v)),
        Some(CqlValue::Uuid(v)) => Cell::Text(v.to_string()),
        Some(other) => Cell::Text(format!("{other:?}")),
    }
}

/// Convert a driver result, reading the `[applied]` column of conditional statements.
fn to_query_result(result: scylla::QueryResult) -> QueryResult {
    let applied_idx = result
        .col_specs
        .iter()
        .position(|spec| spec.name == APPLIED_COLUMN);
    let rows: Vec<Row> = result
        .rows
        .unwrap_or_default()
        .into_iter()
        .map(|row| Row::new(row.columns.into_iter().map(to_cell).collect()))
        .collect();

    let applied = match applied_idx {
        Some(idx) => rows
            .first()
            .and_then(|row| row.get(idx))
            .map_or(true, |cell| *cell != Cell::Bool(false)),
        None => true,
    };
    if applied {
        QueryResult::applied(rows)
    } else {
        QueryResult::not_applied()
    }
}

#[async_trait]
impl Session for CassandraSession {
    async fn execute(&self, statement: &Statement) -> DbResult<QueryResult> {
        let guard = self.session.lock().await;
        let session = guard.as_ref().ok_or(DbError::SessionClosed)?;

        let mut query = Query::new(statement.text().to_string());
        query.set_request_timeout(statement.timeout());
        let values: Vec<CqlValue> = statement.values().iter().map(to_cql_value).collect();

        let result = session
            .query(query, values)
            .await
            .map_err(|e| DbError::execution(statement.text(), e))?;
        Ok(to_query_result(result))
    }

    fn dialect(&self) -> Dialect {
        Dialect::Cql
    }

    fn backend_name(&self) -> &'static str {
        "cassandra"
    }

    async fn close(&self) -> DbResult<()> {
        // the driver closes its connection pool on drop
        drop(self.session.lock().await.take());
        Ok(())
    }
}
