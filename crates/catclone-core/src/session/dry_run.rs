//! Session wrapper that plans writes instead of running them.

use super::{Row, SessionError, SqlSession};
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;

/// Forwards queries to the wrapped session and records every `execute`
/// statement without running it.
///
/// Metadata reads (`SELECT`, `SHOW CREATE TABLE`) still hit the warehouse,
/// so the planned statements reflect the real catalog contents.
pub struct DryRunSession<S> {
    inner: S,
    planned: Mutex<Vec<String>>,
}

impl<S: SqlSession> DryRunSession<S> {
    /// Wrap a session.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            planned: Mutex::new(Vec::new()),
        }
    }

    /// Statements that would have been executed, in order.
    pub fn planned_statements(&self) -> Vec<String> {
        self.planned.lock().clone()
    }

    /// Unwrap the inner session.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

#[async_trait]
impl<S: SqlSession> SqlSession for DryRunSession<S> {
    async fn query(&self, sql: &str) -> Result<Vec<Row>, SessionError> {
        self.inner.query(sql).await
    }

    async fn execute(&self, sql: &str) -> Result<(), SessionError> {
        info!(sql, "dry run, statement not executed");
        self.planned.lock().push(sql.to_string());
        Ok(())
    }
}
