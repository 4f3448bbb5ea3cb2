//! Statement construction.
//!
//! Every catalog, schema and table name is emitted as a backtick-quoted
//! identifier with embedded backticks doubled, so names taken from metadata
//! never splice raw text into a statement.

use std::fmt;

/// Name of the reserved metadata schema skipped by discovery.
pub const INFORMATION_SCHEMA: &str = "information_schema";

/// Column holding the statement returned by `SHOW CREATE TABLE`.
pub const CREATE_STATEMENT_COLUMN: &str = "createtab_stmt";

/// Quote a single identifier.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// A three-level `catalog.schema.table` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRef<'a> {
    /// Catalog name.
    pub catalog: &'a str,
    /// Schema name.
    pub schema: &'a str,
    /// Table name.
    pub table: &'a str,
}

impl<'a> TableRef<'a> {
    /// Create a table reference.
    pub fn new(catalog: &'a str, schema: &'a str, table: &'a str) -> Self {
        Self {
            catalog,
            schema,
            table,
        }
    }

    /// The same schema and table under another catalog.
    pub fn in_catalog(&self, catalog: &'a str) -> Self {
        Self { catalog, ..*self }
    }

    /// Unquoted `catalog.schema.table`, for logs and reports.
    pub fn display_name(&self) -> String {
        format!("{}.{}.{}", self.catalog, self.schema, self.table)
    }

    /// Whether the given name parts designate this table.
    ///
    /// Catalog object names are case-insensitive in the warehouse.
    pub fn matches_parts(&self, parts: &[String]) -> bool {
        match parts {
            [catalog, schema, table] => {
                catalog.eq_ignore_ascii_case(self.catalog)
                    && schema.eq_ignore_ascii_case(self.schema)
                    && table.eq_ignore_ascii_case(self.table)
            }
            _ => false,
        }
    }
}

impl fmt::Display for TableRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            quote_ident(self.catalog),
            quote_ident(self.schema),
            quote_ident(self.table)
        )
    }
}

/// List the schemas of a catalog, excluding `information_schema`.
pub fn list_schemas(catalog: &str) -> String {
    format!(
        "SELECT schema_name FROM {}.information_schema.schemata WHERE schema_name != '{}'",
        quote_ident(catalog),
        INFORMATION_SCHEMA
    )
}

/// List every table of a catalog, excluding `information_schema`.
pub fn list_tables(catalog: &str) -> String {
    format!(
        "SELECT table_schema, table_name, table_type FROM {}.information_schema.tables WHERE table_schema != '{}'",
        quote_ident(catalog),
        INFORMATION_SCHEMA
    )
}

/// Create a schema unless it already exists.
pub fn create_schema(catalog: &str, schema: &str) -> String {
    format!(
        "CREATE SCHEMA IF NOT EXISTS {}.{}",
        quote_ident(catalog),
        quote_ident(schema)
    )
}

/// Replace `destination` with a deep clone of `source`.
pub fn deep_clone(destination: &TableRef<'_>, source: &TableRef<'_>) -> String {
    format!("CREATE OR REPLACE TABLE {} DEEP CLONE {}", destination, source)
}

/// Capture a table's DDL.
pub fn show_create_table(table: &TableRef<'_>) -> String {
    format!("SHOW CREATE TABLE {}", table)
}

/// Drop a table registration.
pub fn drop_table(table: &TableRef<'_>) -> String {
    format!("DROP TABLE {}", table)
}
