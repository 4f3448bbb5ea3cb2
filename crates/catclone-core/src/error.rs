//! Core error types.

use crate::session::SessionError;
use thiserror::Error;

/// Errors raised while discovering or replicating a catalog.
#[derive(Debug, Error)]
pub enum Error {
    /// A table row referenced a schema absent from the schema listing.
    #[error("schema '{schema}' not found for table '{table}'")]
    SchemaNotFound {
        /// Schema name reported by the table row.
        schema: String,
        /// Table that referenced it.
        table: String,
    },

    /// More than one discovered schema carries the same name.
    #[error("more than one schema found with name '{schema}' ({matches} matches)")]
    DuplicateSchema {
        /// The ambiguous schema name.
        schema: String,
        /// Number of schemas sharing the name.
        matches: usize,
    },

    /// A result row lacks a required column, or the column is NULL.
    #[error("column '{column}' missing from result row")]
    MissingColumn {
        /// Column name.
        column: String,
    },

    /// A statement that must return a row returned none.
    #[error("statement returned no rows: {sql}")]
    EmptyResult {
        /// The statement text.
        sql: String,
    },

    /// Captured DDL does not begin with `CREATE TABLE` for the source table.
    #[error("captured DDL for {table} does not create that table")]
    UnrecognizedDdl {
        /// Fully-qualified source table.
        table: String,
    },

    /// The external table could not be created in the destination catalog.
    #[error("could not create External Table {table}: {source}; {}", rollback_outcome(.rollback))]
    ExternalTableCreate {
        /// Fully-qualified destination table.
        table: String,
        /// Failure of the rewritten create statement.
        #[source]
        source: SessionError,
        /// Failure of the compensating re-create at the source, if any.
        rollback: Option<SessionError>,
    },

    /// The SQL session rejected a statement.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

impl Error {
    /// Whether this error left a source table dropped with nothing registered
    /// in its place.
    pub fn source_table_lost(&self) -> bool {
        matches!(
            self,
            Error::ExternalTableCreate {
                rollback: Some(_),
                ..
            }
        )
    }
}

fn rollback_outcome(rollback: &Option<SessionError>) -> String {
    match rollback {
        None => "source table restored".to_string(),
        Some(e) => format!("restoring source table also failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_table_message() {
        let err = Error::ExternalTableCreate {
            table: "`b`.`s`.`t`".to_string(),
            source: SessionError::Timeout,
            rollback: None,
        };
        let message = err.to_string();
        assert!(message.starts_with("could not create External Table `b`.`s`.`t`"));
        assert!(message.ends_with("source table restored"));
        assert!(!err.source_table_lost());
    }

    #[test]
    fn test_rollback_failure_is_reported() {
        let err = Error::ExternalTableCreate {
            table: "`b`.`s`.`t`".to_string(),
            source: SessionError::Timeout,
            rollback: Some(SessionError::Transport("connection reset".to_string())),
        };
        assert!(err.to_string().contains("connection reset"));
        assert!(err.source_table_lost());
    }
}
