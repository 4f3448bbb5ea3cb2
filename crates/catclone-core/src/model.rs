//! In-memory catalog tree built by discovery.
//!
//! The tree only records names and table types; the warehouse stays the
//! source of truth for columns, partitioning and storage details.

use serde::{Serialize, Serializer};
use std::fmt;

/// Declared type of a table as reported by `information_schema.tables`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableType {
    /// Storage lifecycle owned by the catalog.
    Managed,
    /// Registered against externally-owned storage.
    External,
    /// Any other type (views, streaming tables, ...). Never replicated.
    Other(String),
}

impl TableType {
    /// Parse the `table_type` column value.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("MANAGED") {
            TableType::Managed
        } else if value.eq_ignore_ascii_case("EXTERNAL") {
            TableType::External
        } else {
            TableType::Other(value.to_string())
        }
    }

    /// The type as the warehouse spells it.
    pub fn as_str(&self) -> &str {
        match self {
            TableType::Managed => "MANAGED",
            TableType::External => "EXTERNAL",
            TableType::Other(value) => value,
        }
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for TableType {
    fn from(value: &str) -> Self {
        TableType::parse(value)
    }
}

impl Serialize for TableType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Declared table type.
    #[serde(rename = "type")]
    pub table_type: TableType,
}

impl Table {
    /// Create a table entry.
    pub fn new(name: impl Into<String>, table_type: impl Into<TableType>) -> Self {
        Self {
            name: name.into(),
            table_type: table_type.into(),
        }
    }

    /// Create a managed table entry.
    pub fn managed(name: impl Into<String>) -> Self {
        Self::new(name, TableType::Managed)
    }

    /// Create an external table entry.
    pub fn external(name: impl Into<String>) -> Self {
        Self::new(name, TableType::External)
    }
}

/// A schema and its tables, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Schema name, unique within its catalog.
    pub name: String,
    /// Tables in query-row order.
    pub tables: Vec<Table>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
        }
    }

    /// Add a table to the schema.
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }
}

/// A discovered catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    /// Catalog name.
    pub name: String,
    /// Schemas in query-row order.
    pub schemas: Vec<Schema>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schemas: Vec::new(),
        }
    }

    /// Add a schema to the catalog.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schemas.push(schema);
        self
    }

    /// Total number of tables across all schemas.
    pub fn table_count(&self) -> usize {
        self.schemas.iter().map(|s| s.tables.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_type_parse() {
        assert_eq!(TableType::parse("MANAGED"), TableType::Managed);
        assert_eq!(TableType::parse("external"), TableType::External);
        assert_eq!(
            TableType::parse("VIEW"),
            TableType::Other("VIEW".to_string())
        );
        assert_eq!(TableType::parse("VIEW").as_str(), "VIEW");
    }

    #[test]
    fn test_table_count() {
        let catalog = Catalog::new("main")
            .with_schema(
                Schema::new("sales")
                    .with_table(Table::managed("orders"))
                    .with_table(Table::external("raw_orders")),
            )
            .with_schema(Schema::new("empty"));

        assert_eq!(catalog.table_count(), 2);
    }

    #[test]
    fn test_serialize_tree() {
        let catalog = Catalog::new("main")
            .with_schema(Schema::new("sales").with_table(Table::new("v_orders", "VIEW")));

        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(json["schemas"][0]["tables"][0]["type"], "VIEW");
        assert_eq!(json["schemas"][0]["tables"][0]["name"], "v_orders");
    }
}
