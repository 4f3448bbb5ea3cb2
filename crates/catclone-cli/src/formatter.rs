//! Output formatters for reports and catalog trees.

use catclone_core::{Catalog, CopyReport};
use clap::ValueEnum;
use comfy_table::{Cell, Table};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format the result of a copy.
    fn format_report(&self, report: &CopyReport) -> String;

    /// Format a discovered catalog.
    fn format_catalog(&self, catalog: &Catalog) -> String;

    /// Format the statements a dry run would execute.
    fn format_plan(&self, statements: &[String]) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_report(&self, report: &CopyReport) -> String {
        let mut table = Table::new();
        table.set_header(vec!["Object", "Action"]);

        for schema in &report.schemas_ensured {
            table.add_row(vec![Cell::new(schema), Cell::new("schema ensured")]);
        }
        for name in &report.managed_cloned {
            table.add_row(vec![Cell::new(name), Cell::new("deep cloned")]);
        }
        for name in &report.external_recreated {
            table.add_row(vec![Cell::new(name), Cell::new("external recreated")]);
        }
        for skipped in &report.skipped {
            table.add_row(vec![
                Cell::new(format!("{}.{}", skipped.schema, skipped.table)),
                Cell::new(format!("skipped ({}, {})", skipped.table_type, skipped.reason)),
            ]);
        }

        format!("{}\n{}", table, report.summary())
    }

    fn format_catalog(&self, catalog: &Catalog) -> String {
        let mut table = Table::new();
        table.set_header(vec!["Schema", "Table", "Type"]);

        for schema in &catalog.schemas {
            if schema.tables.is_empty() {
                table.add_row(vec![Cell::new(&schema.name), Cell::new(""), Cell::new("")]);
            }
            for t in &schema.tables {
                table.add_row(vec![
                    Cell::new(&schema.name),
                    Cell::new(&t.name),
                    Cell::new(t.table_type.as_str()),
                ]);
            }
        }

        format!(
            "{}\n{}: {} schema(s), {} table(s)",
            table,
            catalog.name,
            catalog.schemas.len(),
            catalog.table_count()
        )
    }

    fn format_plan(&self, statements: &[String]) -> String {
        if statements.is_empty() {
            return "No statements planned".to_string();
        }
        statements
            .iter()
            .map(|s| format!("{};", s))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl JsonFormatter {
    fn to_json<T: serde::Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}

impl Formatter for JsonFormatter {
    fn format_report(&self, report: &CopyReport) -> String {
        Self::to_json(report)
    }

    fn format_catalog(&self, catalog: &Catalog) -> String {
        Self::to_json(catalog)
    }

    fn format_plan(&self, statements: &[String]) -> String {
        Self::to_json(&statements)
    }
}
