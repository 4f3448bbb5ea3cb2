//! Command-line arguments and the configuration derived from them.

use std::time::Duration;

use catclone_client::ClientConfig;
use catclone_core::CopyOptions;
use clap::{Parser, Subcommand};

use crate::formatter::OutputFormat;

/// Clone the schema/table structure of one catalog into another.
#[derive(Debug, Parser)]
#[command(name = "catclone")]
#[command(version, about = "Clone warehouse catalogs")]
pub struct Args {
    /// Workspace host.
    #[arg(long, env = "DATABRICKS_HOST")]
    pub host: String,

    /// Access token.
    #[arg(long, env = "DATABRICKS_TOKEN", hide_env_values = true)]
    pub token: String,

    /// SQL warehouse id.
    #[arg(long, env = "DATABRICKS_WAREHOUSE_ID")]
    pub warehouse_id: String,

    /// HTTP request timeout in seconds. Must exceed the 30s server-side wait.
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,

    /// Deadline for a single statement in seconds.
    #[arg(long, default_value_t = 1800)]
    pub statement_timeout: u64,

    /// Interval between statement status polls in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// Output format.
    #[arg(long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Log every statement.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Copy a catalog into another catalog.
    Copy(CopyArgs),
    /// Print the schema/table tree of a catalog.
    Inspect {
        /// Catalog to inspect.
        #[arg(long)]
        catalog: String,
    },
}

/// Arguments of `catclone copy`.
#[derive(Debug, clap::Args)]
pub struct CopyArgs {
    /// Catalog to copy from.
    #[arg(long)]
    pub source: String,

    /// Catalog to copy into.
    #[arg(long)]
    pub destination: String,

    /// Deep-clone managed tables.
    #[arg(long)]
    pub managed: bool,

    /// Move external tables to the destination catalog. Drops the source
    /// registrations.
    #[arg(long)]
    pub external: bool,

    /// Print the statements that would run without executing them.
    #[arg(long)]
    pub dry_run: bool,
}

impl CopyArgs {
    /// Table-type gates.
    pub fn options(&self) -> CopyOptions {
        CopyOptions::new()
            .with_managed(self.managed)
            .with_external(self.external)
    }

    /// Reject argument combinations that cannot work.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.source.trim().is_empty() || self.destination.trim().is_empty() {
            anyhow::bail!("source and destination catalogs must be non-empty");
        }
        if self.source.eq_ignore_ascii_case(&self.destination) {
            anyhow::bail!("source and destination catalogs must differ");
        }
        Ok(())
    }
}

impl From<&Args> for ClientConfig {
    fn from(args: &Args) -> Self {
        ClientConfig::new(&args.host, &args.token, &args.warehouse_id)
            .with_timeout(Duration::from_secs(args.timeout))
            .with_statement_timeout(Duration::from_secs(args.statement_timeout))
            .with_poll_interval(Duration::from_millis(args.poll_interval_ms))
    }
}
