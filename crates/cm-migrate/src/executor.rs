//! Statement execution with a per-statement deadline.

use cm_db::{DbError, DbResult, Dialect, QueryResult, Session, Statement};
use std::time::Duration;

/// Runs statements on a session, enforcing the statement timeout and the
/// applied flag.
///
/// A statement that does not complete within the timeout is cancelled on the
/// session and fails with [`DbError::Timeout`]; one the database reports as
/// not applied fails with [`DbError::NotApplied`].
#[derive(Clone, Copy)]
pub struct StatementExecutor<'a> {
    session: &'a dyn Session,
    timeout: Duration,
}

impl<'a> StatementExecutor<'a> {
    pub fn new(session: &'a dyn Session, timeout: Duration) -> Self {
        Self { session, timeout }
    }

    pub fn dialect(&self) -> Dialect {
        self.session.dialect()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn execute(&self, statement: Statement) -> DbResult<QueryResult> {
        let statement = statement.with_timeout(self.timeout);
        log::trace!("{} <- {}", self.session.backend_name(), statement);

        let pending = self.session.execute(&statement);
        let result = match tokio::time::timeout(self.timeout, pending).await {
            Ok(result) => result?,
            Err(_) => {
                log::warn!(
                    "Statement exceeded {}ms, cancelling: {}",
                    self.timeout.as_millis(),
                    statement.text()
                );
                self.session.cancel();
                return Err(DbError::Timeout {
                    statement: statement.text().to_string(),
                    timeout_ms: self.timeout.as_millis(),
                });
            }
        };

        if !result.was_applied() {
            return Err(DbError::NotApplied {
                statement: statement.text().to_string(),
            });
        }
        Ok(result)
    }
}
