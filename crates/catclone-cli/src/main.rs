//! catclone command-line client.
//!
//! Copies the schema/table structure of one catalog into another through a
//! SQL warehouse, or prints a catalog's tree.

mod config;
mod formatter;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catclone_client::{ClientConfig, WarehouseClient};
use catclone_core::{copy_catalog, discover_catalog, DryRunSession};
use config::{Args, Command, CopyArgs};
use formatter::Formatter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "catclone=debug,catclone_core=debug,catclone_client=debug"
    } else {
        "catclone=info,catclone_core=info,catclone_client=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client_config = ClientConfig::from(&args);
    tracing::info!(
        host = %client_config.base_url(),
        warehouse_id = %client_config.warehouse_id,
        "connecting to warehouse"
    );
    let client = WarehouseClient::new(client_config)?;
    let formatter = formatter::create_formatter(args.format);

    match &args.command {
        Command::Copy(copy) => run_copy(client, copy, &*formatter).await,
        Command::Inspect { catalog } => {
            let catalog = discover_catalog(&client, catalog).await?;
            println!("{}", formatter.format_catalog(&catalog));
            Ok(())
        }
    }
}

/// Copy a catalog, or plan the copy when `--dry-run` is set.
async fn run_copy(
    client: WarehouseClient,
    copy: &CopyArgs,
    formatter: &dyn Formatter,
) -> anyhow::Result<()> {
    copy.validate()?;

    if copy.external && !copy.dry_run {
        tracing::warn!(
            source = %copy.source,
            "external tables will be dropped from the source catalog and re-registered in the destination"
        );
    }

    if copy.dry_run {
        let session = DryRunSession::new(client);
        let report = copy_catalog(&session, &copy.source, &copy.destination, copy.options()).await?;
        println!("{}", formatter.format_plan(&session.planned_statements()));
        tracing::info!(summary = %report.summary(), "dry run complete");
        return Ok(());
    }

    match copy_catalog(&client, &copy.source, &copy.destination, copy.options()).await {
        Ok(report) => {
            println!("{}", formatter.format_report(&report));
            Ok(())
        }
        Err(e) => {
            if e.source_table_lost() {
                tracing::error!(error = %e, "a source external table was dropped and could not be restored");
            }
            Err(e.into())
        }
    }
}
