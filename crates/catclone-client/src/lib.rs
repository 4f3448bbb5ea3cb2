//! catclone client - SQL warehouse session over HTTP.
//!
//! Implements [`catclone_core::SqlSession`] on top of the Databricks SQL
//! Statement Execution API.
//!
//! # Quick Start
//!
//! ```ignore
//! use catclone_client::{ClientConfig, WarehouseClient};
//!
//! let config = ClientConfig::new("adb-123.azuredatabricks.net", token, "abc123");
//! let client = WarehouseClient::new(config)?;
//! let rows = client.fetch_rows("SELECT 1").await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod wire;

pub use client::WarehouseClient;
pub use config::ClientConfig;
pub use error::Error;
