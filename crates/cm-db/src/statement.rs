//! Statements sent through a [`Session`](crate::Session) and the results that
//! come back.
//!
//! Data values are always bound as parameters. Only identifiers that were
//! validated upstream (keyspace and table names) are spliced into statement
//! text.

use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// A bound parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    BigInt(i64),
    Text(String),
    Bool(bool),
    Uuid(Uuid),
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

/// Whether a statement is expected to return rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Returns rows (`SELECT`)
    Query,
    /// DDL / DML; any rows returned are ignored
    Execute,
}

/// One statement with its bound values
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    text: String,
    values: Vec<Value>,
    kind: StatementKind,
    timeout: Option<Duration>,
}

impl Statement {
    /// A statement that returns rows.
    pub fn query(text: impl Into<String>) -> Self {
        Self::with_kind(text, StatementKind::Query)
    }

    /// A statement whose rows, if any, are not read.
    pub fn execute(text: impl Into<String>) -> Self {
        Self::with_kind(text, StatementKind::Execute)
    }

    fn with_kind(text: impl Into<String>, kind: StatementKind) -> Self {
        Self {
            text: text.into(),
            values: Vec::new(),
            kind,
            timeout: None,
        }
    }

    /// Bind the next positional `?` parameter.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Attach a timeout the driver should also enforce, if it can.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One column value read back from a result row
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

/// A result row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row(Vec<Cell>);

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self(cells)
    }

    pub fn get(&self, idx: usize) -> Option<&Cell> {
        self.0.get(idx)
    }

    /// Integer value of column `idx`, if it holds one.
    pub fn get_int(&self, idx: usize) -> Option<i64> {
        match self.0.get(idx) {
            Some(Cell::Int(n)) => Some(*n),
            _ => None,
        }
    }

    /// Text value of column `idx`, if it holds one.
    pub fn get_text(&self, idx: usize) -> Option<&str> {
        match self.0.get(idx) {
            Some(Cell::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Cell>> for Row {
    fn from(cells: Vec<Cell>) -> Self {
        Self(cells)
    }
}

/// Outcome of a statement execution
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    applied: bool,
    rows: Vec<Row>,
}

impl QueryResult {
    /// Applied result carrying `rows`.
    pub fn applied(rows: Vec<Row>) -> Self {
        Self {
            applied: true,
            rows,
        }
    }

    /// Result of a statement the database accepted but did not apply.
    pub fn not_applied() -> Self {
        Self {
            applied: false,
            rows: Vec::new(),
        }
    }

    pub fn was_applied(&self) -> bool {
        self.applied
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}
