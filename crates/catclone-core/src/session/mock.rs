//! Scripted in-memory session for tests.

use super::{Row, SessionError, SqlSession};
use async_trait::async_trait;
use parking_lot::Mutex;

/// How a statement reached the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Through [`SqlSession::query`].
    Query,
    /// Through [`SqlSession::execute`].
    Execute,
}

/// A statement seen by a [`MockSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedStatement {
    /// Entry point used.
    pub kind: StatementKind,
    /// Statement text.
    pub sql: String,
}

#[derive(Default)]
struct MockState {
    responses: Vec<(String, Vec<Row>)>,
    failures: Vec<(String, SessionError)>,
    log: Vec<RecordedStatement>,
}

/// A session answering from canned results keyed by statement prefix.
///
/// Failures are checked before results. Unmatched queries return no rows and
/// unmatched executes succeed. Every statement is logged, failed ones included.
#[derive(Default)]
pub struct MockSession {
    state: Mutex<MockState>,
}

impl MockSession {
    /// Create an empty mock session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer statements starting with `prefix` with `rows`.
    pub fn with_rows(self, prefix: impl Into<String>, rows: Vec<Row>) -> Self {
        self.state.lock().responses.push((prefix.into(), rows));
        self
    }

    /// Fail statements starting with `prefix` with `error`.
    pub fn with_failure(self, prefix: impl Into<String>, error: SessionError) -> Self {
        self.state.lock().failures.push((prefix.into(), error));
        self
    }

    /// Full statement log.
    pub fn recorded(&self) -> Vec<RecordedStatement> {
        self.state.lock().log.clone()
    }

    /// Statement texts in order.
    pub fn statements(&self) -> Vec<String> {
        self.state.lock().log.iter().map(|s| s.sql.clone()).collect()
    }

    /// Number of logged statements starting with `prefix`.
    pub fn count_matching(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .log
            .iter()
            .filter(|s| s.sql.starts_with(prefix))
            .count()
    }

    fn record(&self, kind: StatementKind, sql: &str) -> Result<Option<Vec<Row>>, SessionError> {
        let mut state = self.state.lock();
        state.log.push(RecordedStatement {
            kind,
            sql: sql.to_string(),
        });

        if let Some((_, error)) = state.failures.iter().find(|(p, _)| sql.starts_with(p.as_str())) {
            return Err(error.clone());
        }

        Ok(state
            .responses
            .iter()
            .find(|(p, _)| sql.starts_with(p.as_str()))
            .map(|(_, rows)| rows.clone()))
    }
}

#[async_trait]
impl SqlSession for MockSession {
    async fn query(&self, sql: &str) -> Result<Vec<Row>, SessionError> {
        Ok(self.record(StatementKind::Query, sql)?.unwrap_or_default())
    }

    async fn execute(&self, sql: &str) -> Result<(), SessionError> {
        self.record(StatementKind::Execute, sql).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_rows_and_failures() {
        let session = MockSession::new()
            .with_rows("SELECT", vec![Row::new().with("n", "1")])
            .with_failure("DROP", SessionError::statement("DROP", "denied"));

        assert_eq!(session.query("SELECT n").await.unwrap().len(), 1);
        assert!(session.query("SHOW TABLES").await.unwrap().is_empty());
        assert!(session.execute("DROP TABLE t").await.is_err());
        assert!(session.execute("CREATE SCHEMA s").await.is_ok());

        let recorded = session.recorded();
        assert_eq!(recorded.len(), 4);
        assert_eq!(recorded[2].kind, StatementKind::Execute);
        assert_eq!(session.count_matching("DROP"), 1);
    }
}
