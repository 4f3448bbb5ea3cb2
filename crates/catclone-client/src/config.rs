//! Client configuration.

use crate::error::Error;
use std::fmt;
use std::time::Duration;

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default server-side wait before a statement call returns.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default interval between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default deadline for a single statement, polling included.
pub const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    /// Workspace host, with or without scheme.
    pub host: String,

    /// Personal access token.
    pub token: String,

    /// SQL warehouse identifier.
    pub warehouse_id: String,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// Server-side wait per call; zero or 5-50 seconds, and below `timeout`
    /// when non-zero.
    pub wait_timeout: Duration,

    /// Interval between status polls.
    pub poll_interval: Duration,

    /// Deadline for a single statement.
    pub statement_timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration with default timeouts.
    pub fn new(
        host: impl Into<String>,
        token: impl Into<String>,
        warehouse_id: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            token: token.into(),
            warehouse_id: warehouse_id.into(),
            timeout: DEFAULT_TIMEOUT,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            statement_timeout: DEFAULT_STATEMENT_TIMEOUT,
        }
    }

    /// Set the HTTP request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the server-side wait.
    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set the per-statement deadline.
    pub fn with_statement_timeout(mut self, statement_timeout: Duration) -> Self {
        self.statement_timeout = statement_timeout;
        self
    }

    /// Base URL: `https://` added when no scheme is given, trailing slash removed.
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }

    /// The `wait_timeout` request field, e.g. `30s`.
    pub fn wait_timeout_param(&self) -> String {
        format!("{}s", self.wait_timeout.as_secs())
    }

    /// Check the configuration before connecting.
    pub fn validate(&self) -> Result<(), Error> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("host is empty".to_string()));
        }
        if self.token.is_empty() {
            return Err(Error::Config("token is empty".to_string()));
        }
        if self.warehouse_id.trim().is_empty() {
            return Err(Error::Config("warehouse id is empty".to_string()));
        }
        let wait = self.wait_timeout.as_secs();
        if wait != 0 && !(5..=50).contains(&wait) {
            return Err(Error::Config(format!(
                "wait timeout must be 0 or between 5 and 50 seconds, got {}s",
                wait
            )));
        }
        if wait != 0 && self.timeout <= self.wait_timeout {
            return Err(Error::Config(format!(
                "HTTP timeout ({}s) must exceed the wait timeout ({}s)",
                self.timeout.as_secs(),
                wait
            )));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::Config("poll interval must be positive".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .field("warehouse_id", &self.warehouse_id)
            .field("timeout", &self.timeout)
            .field("wait_timeout", &self.wait_timeout)
            .field("poll_interval", &self.poll_interval)
            .field("statement_timeout", &self.statement_timeout)
            .finish()
    }
}
