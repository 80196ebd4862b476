//! Scripted in-process [`Session`] for tests (`test-support` feature).
//!
//! A [`FakeSession`] answers each statement with the first rule whose needle
//! occurs in the statement text, and records every statement it receives.
//! Clones share state, so a test can keep a clone after handing the session
//! to the code under test.

use crate::error::{DbError, DbResult};
use crate::statement::{QueryResult, Row, Statement};
use crate::traits::{Dialect, Session};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How the fake answers a matching statement.
#[derive(Debug, Clone)]
pub enum FakeResponse {
    /// Applied, returning these rows
    Rows(Vec<Row>),
    /// Accepted but not applied
    NotApplied,
    /// Driver error with this message
    Fail(String),
    /// Sleep, then answer applied with no rows
    Hang(Duration),
}

#[derive(Default)]
struct FakeState {
    rules: Mutex<Vec<(String, FakeResponse)>>,
    executed: Mutex<Vec<Statement>>,
    closed: AtomicBool,
    fail_close: AtomicBool,
    cancelled: AtomicUsize,
}

/// Scripted session; unmatched statements are applied with no rows.
#[derive(Clone)]
pub struct FakeSession {
    dialect: Dialect,
    state: Arc<FakeState>,
}

impl FakeSession {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            state: Arc::new(FakeState::default()),
        }
    }

    /// Answer statements containing `needle` with `response`.
    ///
    /// Rules are checked in the order they were added.
    pub fn on(self, needle: impl Into<String>, response: FakeResponse) -> Self {
        self.state
            .rules
            .lock()
            .expect("fake rules lock")
            .push((needle.into(), response));
        self
    }

    /// Make `close` fail.
    pub fn failing_close(self) -> Self {
        self.state.fail_close.store(true, Ordering::SeqCst);
        self
    }

    /// Every statement received, in order.
    pub fn executed(&self) -> Vec<Statement> {
        self.state.executed.lock().expect("fake log lock").clone()
    }

    /// Text of every statement received, in order.
    pub fn executed_texts(&self) -> Vec<String> {
        self.executed().iter().map(|s| s.text().to_string()).collect()
    }

    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }

    /// Number of times `cancel` was called.
    pub fn cancel_count(&self) -> usize {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    fn response_for(&self, text: &str) -> DbResult<Option<FakeResponse>> {
        let rules = self
            .state
            .rules
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))?;
        Ok(rules
            .iter()
            .find(|(needle, _)| text.contains(needle.as_str()))
            .map(|(_, response)| response.clone()))
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn execute(&self, statement: &Statement) -> DbResult<QueryResult> {
        if self.is_closed() {
            return Err(DbError::SessionClosed);
        }
        self.state
            .executed
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))?
            .push(statement.clone());

        match self.response_for(statement.text())? {
            None => Ok(QueryResult::applied(Vec::new())),
            Some(FakeResponse::Rows(rows)) => Ok(QueryResult::applied(rows)),
            Some(FakeResponse::NotApplied) => Ok(QueryResult::not_applied()),
            Some(FakeResponse::Fail(message)) => {
                Err(DbError::execution(statement.text(), message))
            }
            Some(FakeResponse::Hang(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(QueryResult::applied(Vec::new()))
            }
        }
    }

    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn backend_name(&self) -> &'static str {
        "fake"
    }

    fn cancel(&self) {
        self.state.cancelled.fetch_add(1, Ordering::SeqCst);
    }

    async fn close(&self) -> DbResult<()> {
        self.state.closed.store(true, Ordering::SeqCst);
        if self.state.fail_close.load(Ordering::SeqCst) {
            return Err(DbError::CloseError("fake close failure".to_string()));
        }
        Ok(())
    }
}
