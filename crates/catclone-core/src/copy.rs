//! Top-level catalog copy.

use crate::discovery;
use crate::error::Error;
use crate::replication::{self, ReplicationOptions};
use crate::report::CopyReport;
use crate::session::SqlSession;
use tracing::info;

/// Options for [`copy_catalog`]. Both table types are off by default.
pub type CopyOptions = ReplicationOptions;

/// Copy the schema/table structure of `old_catalog_name` into
/// `new_catalog_name`.
///
/// Statements run one after another with no enclosing transaction; a failure
/// part-way leaves the destination partially populated.
pub async fn copy_catalog(
    session: &dyn SqlSession,
    old_catalog_name: &str,
    new_catalog_name: &str,
    options: CopyOptions,
) -> Result<CopyReport, Error> {
    info!(
        source = old_catalog_name,
        destination = new_catalog_name,
        managed = options.managed,
        external = options.external,
        "copying catalog"
    );

    let schemas = discovery::list_schemas(session, old_catalog_name).await?;

    let mut catalog_schemas = Vec::new();
    discovery::build_asset_tree(session, old_catalog_name, &schemas, &mut catalog_schemas).await?;

    let report = replication::create_new_assets(
        session,
        &catalog_schemas,
        old_catalog_name,
        new_catalog_name,
        options,
    )
    .await?;

    info!(summary = %report.summary(), "catalog copied");
    Ok(report)
}
