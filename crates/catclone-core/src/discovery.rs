//! Catalog discovery.
//!
//! Builds the Catalog -> Schema -> Table tree from the source catalog's
//! information schema. Two read-only queries are issued: one for schema
//! names, one for every table of the catalog.

use crate::error::Error;
use crate::model::{Catalog, Schema, Table, TableType};
use crate::session::{Row, SqlSession};
use crate::sql;
use tracing::{debug, info};

/// Query the schema names of a catalog, excluding `information_schema`.
pub async fn list_schemas(
    session: &dyn SqlSession,
    catalog_name: &str,
) -> Result<Vec<Row>, Error> {
    let statement = sql::list_schemas(catalog_name);
    debug!(sql = %statement, "listing schemas");
    Ok(session.query(&statement).await?)
}

/// Append one [`Schema`] per schema row to `catalog_schemas`, then attach
/// every table of the catalog to its schema.
///
/// A table whose schema matches no entry fails with
/// [`Error::SchemaNotFound`]; one matching several entries fails with
/// [`Error::DuplicateSchema`]. Schemas appended before the failure stay in
/// `catalog_schemas`.
pub async fn build_asset_tree(
    session: &dyn SqlSession,
    catalog_name: &str,
    schema_rows: &[Row],
    catalog_schemas: &mut Vec<Schema>,
) -> Result<(), Error> {
    for row in schema_rows {
        catalog_schemas.push(Schema::new(row.require("schema_name")?));
    }

    let statement = sql::list_tables(catalog_name);
    debug!(sql = %statement, "listing tables");
    let table_rows = session.query(&statement).await?;

    for row in &table_rows {
        let schema_name = row.require("table_schema")?;
        let table = Table::new(
            row.require("table_name")?,
            TableType::parse(row.require("table_type")?),
        );

        let mut matches = catalog_schemas
            .iter_mut()
            .filter(|schema| schema.name == schema_name);

        match (matches.next(), matches.next()) {
            (Some(schema), None) => schema.tables.push(table),
            (None, _) => {
                return Err(Error::SchemaNotFound {
                    schema: schema_name.to_string(),
                    table: table.name,
                })
            }
            (Some(_), Some(_)) => {
                return Err(Error::DuplicateSchema {
                    schema: schema_name.to_string(),
                    matches: 2 + matches.count(),
                })
            }
        }
    }

    info!(
        catalog = catalog_name,
        schemas = catalog_schemas.len(),
        tables = table_rows.len(),
        "asset tree built"
    );

    Ok(())
}

/// Discover the whole tree of a catalog.
pub async fn discover_catalog(
    session: &dyn SqlSession,
    catalog_name: &str,
) -> Result<Catalog, Error> {
    let schema_rows = list_schemas(session, catalog_name).await?;
    let mut catalog = Catalog::new(catalog_name);
    build_asset_tree(session, catalog_name, &schema_rows, &mut catalog.schemas).await?;
    Ok(catalog)
}
