//! Warehouse client.
//!
//! Statements are submitted to `POST /api/2.0/sql/statements` and polled until
//! they leave the `PENDING`/`RUNNING` states. Inline result chunks beyond the
//! first are fetched through their internal links.

use async_trait::async_trait;
use catclone_core::{Row, SessionError, SqlSession};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::Error;
use crate::wire::{
    rows_from_chunks, ExecuteStatementRequest, ResultData, StatementResponse, StatementState,
};

const STATEMENTS_PATH: &str = "/api/2.0/sql/statements";

/// A SQL warehouse session over HTTP.
pub struct WarehouseClient {
    http: Client,
    base_url: String,
    config: ClientConfig,
}

impl WarehouseClient {
    /// Create a client. No request is made until the first statement.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        config.validate()?;

        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            config,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run a statement to completion.
    ///
    /// A statement still running at the deadline is cancelled and reported
    /// as [`Error::Timeout`].
    pub async fn run_statement(&self, sql: &str) -> Result<StatementResponse, Error> {
        let deadline = Instant::now() + self.config.statement_timeout;
        let request = ExecuteStatementRequest::new(
            sql,
            &self.config.warehouse_id,
            self.config.wait_timeout_param(),
        );

        let url = format!("{}{}", self.base_url, STATEMENTS_PATH);
        let mut response: StatementResponse =
            self.send(self.http.post(&url).json(&request)).await?;
        debug!(
            statement_id = %response.statement_id,
            state = response.status.state.as_str(),
            "statement submitted"
        );

        while response.status.state.is_active() {
            if Instant::now() >= deadline {
                self.cancel(&response.statement_id).await;
                return Err(Error::Timeout);
            }
            sleep(self.config.poll_interval).await;

            let url = format!("{}{}/{}", self.base_url, STATEMENTS_PATH, response.statement_id);
            response = self.send(self.http.get(&url)).await?;
        }

        match response.status.state {
            StatementState::Succeeded => Ok(response),
            state => Err(Error::StatementFailed {
                state: state.as_str().to_string(),
                message: response
                    .status
                    .error
                    .as_ref()
                    .map(|e| e.describe())
                    .unwrap_or_else(|| "no error details".to_string()),
            }),
        }
    }

    /// Run a statement and collect all of its rows.
    pub async fn fetch_rows(&self, sql: &str) -> Result<Vec<Row>, Error> {
        let response = self.run_statement(sql).await?;
        let columns = response.column_names();

        let mut chunks = Vec::new();
        if let Some(first) = response.result {
            let mut next = first.next_chunk_internal_link.clone();
            chunks.push(first);
            while let Some(link) = next {
                let url = format!("{}{}", self.base_url, link);
                let chunk: ResultData = self.send(self.http.get(&url)).await?;
                next = chunk.next_chunk_internal_link.clone();
                chunks.push(chunk);
            }
        }

        if columns.is_empty() && chunks.iter().any(|c| c.data_array.is_some()) {
            return Err(Error::InvalidResponse(
                "result data without a column schema".to_string(),
            ));
        }

        Ok(rows_from_chunks(&columns, &chunks))
    }

    async fn cancel(&self, statement_id: &str) {
        let url = format!("{}{}/{}/cancel", self.base_url, STATEMENTS_PATH, statement_id);
        let result = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await;
        if let Err(e) = result {
            warn!(statement_id, error = %e, "failed to cancel statement");
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, Error> {
        let response = request.bearer_auth(&self.config.token).send().await?;

        if response.status().is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| Error::InvalidResponse(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(Error::Api { status, body })
        }
    }
}

#[async_trait]
impl SqlSession for WarehouseClient {
    async fn query(&self, sql: &str) -> Result<Vec<Row>, SessionError> {
        self.fetch_rows(sql)
            .await
            .map_err(|e| e.into_session_error(sql))
    }

    async fn execute(&self, sql: &str) -> Result<(), SessionError> {
        self.run_statement(sql)
            .await
            .map(|_| ())
            .map_err(|e| e.into_session_error(sql))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = WarehouseClient::new(ClientConfig::new("", "t", "w"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_new_normalizes_host() {
        let config = ClientConfig::new("adb-1.cloud.databricks.com/", "t", "w");
        let client = WarehouseClient::new(config).unwrap();
        assert_eq!(client.base_url, "https://adb-1.cloud.databricks.com");
        assert_eq!(client.config().warehouse_id, "w");
    }
}
