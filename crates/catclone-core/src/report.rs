//! Outcome of a catalog copy.

use crate::model::TableType;
use serde::Serialize;
use std::fmt;

/// Why a table was not replicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Its type is supported but the matching flag was off.
    Disabled,
    /// Its type has no replication strategy.
    Unsupported,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Disabled => write!(f, "disabled"),
            SkipReason::Unsupported => write!(f, "unsupported type"),
        }
    }
}

/// A table left out of the copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedTable {
    /// Schema name.
    pub schema: String,
    /// Table name.
    pub table: String,
    /// Declared table type.
    pub table_type: TableType,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// What a copy run did, in the order it did it.
///
/// Table entries are `schema.table`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CopyReport {
    /// Source catalog.
    pub source_catalog: String,
    /// Destination catalog.
    pub destination_catalog: String,
    /// Schemas ensured in the destination.
    pub schemas_ensured: Vec<String>,
    /// Managed tables deep-cloned.
    pub managed_cloned: Vec<String>,
    /// External tables re-registered under the destination.
    pub external_recreated: Vec<String>,
    /// Tables left untouched.
    pub skipped: Vec<SkippedTable>,
}

impl CopyReport {
    /// Create an empty report.
    pub fn new(source_catalog: impl Into<String>, destination_catalog: impl Into<String>) -> Self {
        Self {
            source_catalog: source_catalog.into(),
            destination_catalog: destination_catalog.into(),
            ..Self::default()
        }
    }

    /// Number of tables replicated.
    pub fn tables_copied(&self) -> usize {
        self.managed_cloned.len() + self.external_recreated.len()
    }

    /// One-line summary.
    pub fn summary(&self) -> String {
        format!(
            "{} -> {}: {} schemas, {} managed tables cloned, {} external tables recreated, {} skipped",
            self.source_catalog,
            self.destination_catalog,
            self.schemas_ensured.len(),
            self.managed_cloned.len(),
            self.external_recreated.len(),
            self.skipped.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let mut report = CopyReport::new("main", "main_clone");
        report.schemas_ensured.push("sales".to_string());
        report.managed_cloned.push("sales.orders".to_string());
        report.skipped.push(SkippedTable {
            schema: "sales".to_string(),
            table: "v_orders".to_string(),
            table_type: TableType::Other("VIEW".to_string()),
            reason: SkipReason::Unsupported,
        });

        assert_eq!(report.tables_copied(), 1);
        assert_eq!(
            report.summary(),
            "main -> main_clone: 1 schemas, 1 managed tables cloned, 0 external tables recreated, 1 skipped"
        );
    }

    #[test]
    fn test_serialize_skip_reason() {
        let json = serde_json::to_string(&SkipReason::Disabled).unwrap();
        assert_eq!(json, "\"disabled\"");
    }
}
