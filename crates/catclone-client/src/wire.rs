//! Statement Execution API wire types.

use catclone_core::Row;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/2.0/sql/statements`.
#[derive(Debug, Serialize)]
pub struct ExecuteStatementRequest<'a> {
    /// SQL text.
    pub statement: &'a str,
    /// Target warehouse.
    pub warehouse_id: &'a str,
    /// Server-side wait, e.g. `30s`.
    pub wait_timeout: String,
    /// Keep running after the wait elapses.
    pub on_wait_timeout: &'static str,
    /// Result encoding.
    pub format: &'static str,
    /// Result delivery.
    pub disposition: &'static str,
}

impl<'a> ExecuteStatementRequest<'a> {
    /// Request inline JSON results, continuing past the wait timeout.
    pub fn new(statement: &'a str, warehouse_id: &'a str, wait_timeout: String) -> Self {
        Self {
            statement,
            warehouse_id,
            wait_timeout,
            on_wait_timeout: "CONTINUE",
            format: "JSON_ARRAY",
            disposition: "INLINE",
        }
    }
}

/// Statement lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementState {
    /// Queued on the warehouse.
    Pending,
    /// Executing.
    Running,
    /// Finished; results available.
    Succeeded,
    /// Finished with an error.
    Failed,
    /// Cancelled by a client.
    Canceled,
    /// Results released.
    Closed,
}

impl StatementState {
    /// Whether the statement is still in flight.
    pub fn is_active(self) -> bool {
        matches!(self, StatementState::Pending | StatementState::Running)
    }

    /// Name as the API spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            StatementState::Pending => "PENDING",
            StatementState::Running => "RUNNING",
            StatementState::Succeeded => "SUCCEEDED",
            StatementState::Failed => "FAILED",
            StatementState::Canceled => "CANCELED",
            StatementState::Closed => "CLOSED",
        }
    }
}

/// Error details attached to a failed statement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceError {
    /// Error class, e.g. `BAD_REQUEST`.
    pub error_code: Option<String>,
    /// Engine message.
    pub message: Option<String>,
}

impl ServiceError {
    /// `CODE: message`, or whichever part is present.
    pub fn describe(&self) -> String {
        match (&self.error_code, &self.message) {
            (Some(code), Some(message)) => format!("{}: {}", code, message),
            (Some(code), None) => code.clone(),
            (None, Some(message)) => message.clone(),
            (None, None) => "no error details".to_string(),
        }
    }
}

/// Current state of a statement.
#[derive(Debug, Clone, Deserialize)]
pub struct StatementStatus {
    /// Lifecycle state.
    pub state: StatementState,
    /// Present once the statement has failed.
    #[serde(default)]
    pub error: Option<ServiceError>,
}

/// A result column.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
}

/// Result columns in position order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultSchema {
    /// Columns.
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
}

/// Result metadata; only the schema is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultManifest {
    /// Column schema. Absent for statements without a result set.
    #[serde(default)]
    pub schema: Option<ResultSchema>,
}

/// One chunk of inline results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultData {
    /// Rows as nullable strings, in column order.
    #[serde(default)]
    pub data_array: Option<Vec<Vec<Option<String>>>>,
    /// Path of the next chunk, relative to the host.
    #[serde(default)]
    pub next_chunk_internal_link: Option<String>,
}

/// Response of the submit and status endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct StatementResponse {
    /// Server-assigned id used for polling and cancellation.
    pub statement_id: String,
    /// Current status.
    pub status: StatementStatus,
    /// Result metadata, present once the statement succeeded.
    #[serde(default)]
    pub manifest: Option<ResultManifest>,
    /// First chunk of inline results.
    #[serde(default)]
    pub result: Option<ResultData>,
}

impl StatementResponse {
    /// Column names from the manifest.
    pub fn column_names(&self) -> Vec<String> {
        self.manifest
            .as_ref()
            .and_then(|m| m.schema.as_ref())
            .map(|s| s.columns.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default()
    }
}

/// Turn result chunks into rows keyed by `columns`.
pub fn rows_from_chunks<'a>(
    columns: &[String],
    chunks: impl IntoIterator<Item = &'a ResultData>,
) -> Vec<Row> {
    chunks
        .into_iter()
        .filter_map(|chunk| chunk.data_array.as_ref())
        .flatten()
        .map(|values| Row::from_parts(columns, values.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUCCEEDED: &str = r#"{
        "statement_id": "01ef-abc",
        "status": { "state": "SUCCEEDED" },
        "manifest": {
            "format": "JSON_ARRAY",
            "schema": {
                "column_count": 3,
                "columns": [
                    { "name": "table_schema", "type_name": "STRING", "position": 0 },
                    { "name": "table_name", "type_name": "STRING", "position": 1 },
                    { "name": "table_type", "type_name": "STRING", "position": 2 }
                ]
            },
            "total_chunk_count": 2
        },
        "result": {
            "chunk_index": 0,
            "data_array": [
                ["sales", "orders", "MANAGED"],
                ["sales", "raw", null]
            ],
            "next_chunk_internal_link": "/api/2.0/sql/statements/01ef-abc/result/chunks/1"
        }
    }"#;

    #[test]
    fn test_parse_succeeded_response() {
        let response: StatementResponse = serde_json::from_str(SUCCEEDED).unwrap();

        assert_eq!(response.status.state, StatementState::Succeeded);
        assert_eq!(response.column_names(), vec!["table_schema", "table_name", "table_type"]);

        let result = response.result.as_ref().unwrap();
        assert!(result.next_chunk_internal_link.is_some());

        let rows = rows_from_chunks(&response.column_names(), [result]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("table_name"), Some("orders"));
        assert_eq!(rows[1].get("table_type"), None);
    }

    #[test]
    fn test_parse_failed_response() {
        let body = r#"{
            "statement_id": "01ef-def",
            "status": {
                "state": "FAILED",
                "error": { "error_code": "BAD_REQUEST", "message": "[TABLE_OR_VIEW_NOT_FOUND]" }
            }
        }"#;
        let response: StatementResponse = serde_json::from_str(body).unwrap();

        assert!(!response.status.state.is_active());
        assert_eq!(
            response.status.error.as_ref().unwrap().describe(),
            "BAD_REQUEST: [TABLE_OR_VIEW_NOT_FOUND]"
        );
        assert!(response.column_names().is_empty());
    }

    #[test]
    fn test_request_body() {
        let request = ExecuteStatementRequest::new("SELECT 1", "wh1", "30s".to_string());
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["statement"], "SELECT 1");
        assert_eq!(json["on_wait_timeout"], "CONTINUE");
        assert_eq!(json["disposition"], "INLINE");
    }
}
