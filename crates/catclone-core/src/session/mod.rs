//! SQL session abstraction.
//!
//! Discovery and replication never talk to the warehouse directly; they go
//! through a [`SqlSession`] handle passed in by the caller.

mod dry_run;
mod mock;

pub use dry_run::DryRunSession;
pub use mock::{MockSession, RecordedStatement, StatementKind};

use crate::error::Error;
use async_trait::async_trait;

/// Errors reported by a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The engine rejected or failed the statement.
    #[error("statement failed: {message}")]
    Statement {
        /// Statement text.
        sql: String,
        /// Engine message.
        message: String,
    },

    /// The engine could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// The statement did not finish in time.
    #[error("statement timed out")]
    Timeout,

    /// The engine answered with something unexpected.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl SessionError {
    /// Create a statement failure.
    pub fn statement(sql: impl Into<String>, message: impl Into<String>) -> Self {
        SessionError::Statement {
            sql: sql.into(),
            message: message.into(),
        }
    }
}

/// A handle that runs SQL statements one at a time.
///
/// Each call completes before the caller issues the next statement.
#[async_trait]
pub trait SqlSession: Send + Sync {
    /// Run a statement and collect its rows.
    async fn query(&self, sql: &str) -> Result<Vec<Row>, SessionError>;

    /// Run a statement for its side effect.
    async fn execute(&self, sql: &str) -> Result<(), SessionError>;
}

#[async_trait]
impl<S: SqlSession + ?Sized> SqlSession for std::sync::Arc<S> {
    async fn query(&self, sql: &str) -> Result<Vec<Row>, SessionError> {
        (**self).query(sql).await
    }

    async fn execute(&self, sql: &str) -> Result<(), SessionError> {
        (**self).execute(sql).await
    }
}

/// A result row: named, nullable string values in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: Vec<(String, Option<String>)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from column names and values.
    ///
    /// Extra values beyond the column list are dropped.
    pub fn from_parts(names: &[String], values: Vec<Option<String>>) -> Self {
        Self {
            columns: names.iter().cloned().zip(values).collect(),
        }
    }

    /// Add a column value.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.columns.push((column.into(), Some(value.into())));
        self
    }

    /// Add a NULL column.
    pub fn with_null(mut self, column: impl Into<String>) -> Self {
        self.columns.push((column.into(), None));
        self
    }

    /// Look up a column value. Column names compare case-insensitively.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .and_then(|(_, value)| value.as_deref())
    }

    /// Look up a column that must be present and non-NULL.
    pub fn require(&self, column: &str) -> Result<&str, Error> {
        self.get(column).ok_or_else(|| Error::MissingColumn {
            column: column.to_string(),
        })
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
