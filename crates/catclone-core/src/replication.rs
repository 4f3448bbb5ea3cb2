//! Catalog replication.
//!
//! Replays a discovered schema list into the destination catalog:
//!
//! - every schema is created with `CREATE SCHEMA IF NOT EXISTS`;
//! - managed tables are deep-cloned in a single statement;
//! - external tables are captured with `SHOW CREATE TABLE`, dropped from the
//!   source (a storage location may back only one registered table), and
//!   re-created from the rewritten DDL.
//!
//! If the rewritten DDL fails, the captured DDL is replayed at the source as a
//! compensating action. That step is best-effort: when it fails too, the
//! source table stays dropped and the error says so.

use crate::ddl;
use crate::error::Error;
use crate::model::{Schema, Table, TableType};
use crate::report::{CopyReport, SkipReason, SkippedTable};
use crate::session::SqlSession;
use crate::sql::{self, TableRef};
use tracing::{debug, error, info, warn};

/// Which table types to replicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplicationOptions {
    /// Deep-clone managed tables.
    pub managed: bool,
    /// Re-register external tables.
    pub external: bool,
}

impl ReplicationOptions {
    /// Options with both table types disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable managed tables.
    pub fn with_managed(mut self, managed: bool) -> Self {
        self.managed = managed;
        self
    }

    /// Enable or disable external tables.
    pub fn with_external(mut self, external: bool) -> Self {
        self.external = external;
        self
    }
}

/// Recreate `schemas` and their enabled tables in `new_catalog_name`.
pub async fn create_new_assets(
    session: &dyn SqlSession,
    schemas: &[Schema],
    old_catalog_name: &str,
    new_catalog_name: &str,
    options: ReplicationOptions,
) -> Result<CopyReport, Error> {
    let mut report = CopyReport::new(old_catalog_name, new_catalog_name);

    for schema in schemas {
        let statement = sql::create_schema(new_catalog_name, &schema.name);
        debug!(sql = %statement, "creating schema");
        session.execute(&statement).await?;
        info!(catalog = new_catalog_name, schema = %schema.name, "schema ensured");
        report.schemas_ensured.push(schema.name.clone());

        if schema.tables.is_empty() {
            continue;
        }

        for table in &schema.tables {
            let source = TableRef::new(old_catalog_name, &schema.name, &table.name);
            let destination = source.in_catalog(new_catalog_name);
            let entry = format!("{}.{}", schema.name, table.name);

            match table.table_type {
                TableType::Managed if options.managed => {
                    clone_managed_table(session, &source, &destination).await?;
                    report.managed_cloned.push(entry);
                }
                TableType::External if options.external => {
                    recreate_external_table(session, &source, &destination).await?;
                    report.external_recreated.push(entry);
                }
                _ => {
                    let reason = skip_reason(table);
                    debug!(table = %entry, table_type = %table.table_type, %reason, "table skipped");
                    report.skipped.push(SkippedTable {
                        schema: schema.name.clone(),
                        table: table.name.clone(),
                        table_type: table.table_type.clone(),
                        reason,
                    });
                }
            }
        }
    }

    Ok(report)
}

fn skip_reason(table: &Table) -> SkipReason {
    match table.table_type {
        TableType::Managed | TableType::External => SkipReason::Disabled,
        TableType::Other(_) => SkipReason::Unsupported,
    }
}

async fn clone_managed_table(
    session: &dyn SqlSession,
    source: &TableRef<'_>,
    destination: &TableRef<'_>,
) -> Result<(), Error> {
    let statement = sql::deep_clone(destination, source);
    debug!(sql = %statement, "deep cloning");
    session.execute(&statement).await?;
    info!(
        source = %source.display_name(),
        destination = %destination.display_name(),
        "managed table cloned"
    );
    Ok(())
}

async fn recreate_external_table(
    session: &dyn SqlSession,
    source: &TableRef<'_>,
    destination: &TableRef<'_>,
) -> Result<(), Error> {
    let show = sql::show_create_table(source);
    debug!(sql = %show, "capturing DDL");
    let rows = session.query(&show).await?;
    let captured = rows
        .first()
        .ok_or_else(|| Error::EmptyResult { sql: show.clone() })?
        .require(sql::CREATE_STATEMENT_COLUMN)?;

    // Computed before the drop so unusable DDL never costs the source table.
    let statements = ddl::prepare_external_ddl(captured, source, destination).ok_or_else(|| {
        Error::UnrecognizedDdl {
            table: source.display_name(),
        }
    })?;

    let drop = sql::drop_table(source);
    debug!(sql = %drop, "dropping source registration");
    session.execute(&drop).await?;

    if let Err(cause) = session.execute(&statements.replay).await {
        warn!(
            table = %destination.display_name(),
            error = %cause,
            "external table creation failed, restoring source table"
        );

        let rollback = session.execute(&statements.rollback).await.err();
        if let Some(e) = &rollback {
            error!(
                table = %source.display_name(),
                error = %e,
                "source table could not be restored"
            );
        }

        return Err(Error::ExternalTableCreate {
            table: destination.display_name(),
            source: cause,
            rollback,
        });
    }

    info!(
        source = %source.display_name(),
        destination = %destination.display_name(),
        "external table recreated"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MockSession, Row, SessionError, StatementKind};

    const CAPTURED: &str = "CREATE TABLE old.sales.raw_orders (id INT) USING delta LOCATION 's3://bucket/raw' TBLPROPERTIES ('a' = 'b')";
    const REPLAY: &str = "CREATE OR REPLACE TABLE `new`.`sales`.`raw_orders` (id INT) USING delta LOCATION 's3://bucket/raw'";
    const ROLLBACK: &str = "CREATE TABLE old.sales.raw_orders (id INT) USING delta LOCATION 's3://bucket/raw'";

    fn mixed_schemas() -> Vec<Schema> {
        vec![Schema::new("sales")
            .with_table(Table::managed("orders"))
            .with_table(Table::external("raw_orders"))]
    }

    fn session() -> MockSession {
        MockSession::new().with_rows(
            "SHOW CREATE TABLE",
            vec![Row::new().with("createtab_stmt", CAPTURED)],
        )
    }

    #[tokio::test]
    async fn test_managed_only() {
        let session = session();
        let options = ReplicationOptions::new().with_managed(true);

        let report = create_new_assets(&session, &mixed_schemas(), "old", "new", options)
            .await
            .unwrap();

        assert_eq!(session.count_matching("CREATE OR REPLACE TABLE"), 1);
        assert_eq!(session.count_matching("SHOW CREATE TABLE"), 0);
        assert_eq!(session.count_matching("DROP TABLE"), 0);
        assert_eq!(
            session.statements(),
            vec![
                "CREATE SCHEMA IF NOT EXISTS `new`.`sales`",
                "CREATE OR REPLACE TABLE `new`.`sales`.`orders` DEEP CLONE `old`.`sales`.`orders`",
            ]
        );
        assert_eq!(report.managed_cloned, vec!["sales.orders"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::Disabled);
    }

    #[tokio::test]
    async fn test_external_only() {
        let session = session();
        let options = ReplicationOptions::new().with_external(true);

        let report = create_new_assets(&session, &mixed_schemas(), "old", "new", options)
            .await
            .unwrap();

        assert_eq!(
            session.statements(),
            vec![
                "CREATE SCHEMA IF NOT EXISTS `new`.`sales`",
                "SHOW CREATE TABLE `old`.`sales`.`raw_orders`",
                "DROP TABLE `old`.`sales`.`raw_orders`",
                REPLAY,
            ]
        );
        assert_eq!(session.count_matching("CREATE OR REPLACE TABLE `new`.`sales`.`orders`"), 0);
        assert_eq!(report.external_recreated, vec!["sales.raw_orders"]);
        assert_eq!(report.skipped[0].table, "orders");
    }

    #[tokio::test]
    async fn test_rollback_on_create_failure() {
        let session = session().with_failure(
            "CREATE OR REPLACE TABLE `new`",
            SessionError::statement(REPLAY, "location already in use"),
        );
        let options = ReplicationOptions::new().with_external(true);

        let err = create_new_assets(&session, &mixed_schemas(), "old", "new", options)
            .await
            .unwrap_err();

        let statements = session.statements();
        assert_eq!(statements.last().map(String::as_str), Some(ROLLBACK));
        assert!(matches!(
            err,
            Error::ExternalTableCreate { rollback: None, .. }
        ));
        assert!(err.to_string().starts_with("could not create External Table"));
        assert!(!err.source_table_lost());
    }

    #[tokio::test]
    async fn test_rollback_failure_is_reported() {
        let session = session()
            .with_failure(
                "CREATE OR REPLACE TABLE `new`",
                SessionError::statement(REPLAY, "location already in use"),
            )
            .with_failure("CREATE TABLE old", SessionError::Timeout);
        let options = ReplicationOptions::new().with_external(true);

        let err = create_new_assets(&session, &mixed_schemas(), "old", "new", options)
            .await
            .unwrap_err();

        match err {
            Error::ExternalTableCreate {
                source, rollback, ..
            } => {
                assert!(matches!(source, SessionError::Statement { .. }));
                assert_eq!(rollback, Some(SessionError::Timeout));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unrecognized_ddl_keeps_source() {
        let session = MockSession::new().with_rows(
            "SHOW CREATE TABLE",
            vec![Row::new().with("createtab_stmt", "CREATE VIEW old.sales.raw_orders AS SELECT 1")],
        );
        let options = ReplicationOptions::new().with_external(true);

        let err = create_new_assets(&session, &mixed_schemas(), "old", "new", options)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UnrecognizedDdl { .. }));
        assert_eq!(session.count_matching("DROP TABLE"), 0);
    }

    #[tokio::test]
    async fn test_empty_show_create_result() {
        let session = MockSession::new();
        let options = ReplicationOptions::new().with_external(true);

        let err = create_new_assets(&session, &mixed_schemas(), "old", "new", options)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::EmptyResult { .. }));
    }

    #[tokio::test]
    async fn test_other_types_and_disabled_flags_issue_nothing() {
        let schemas = vec![
            Schema::new("sales")
                .with_table(Table::new("v_orders", "VIEW"))
                .with_table(Table::managed("orders"))
                .with_table(Table::external("raw_orders")),
            Schema::new("empty"),
        ];
        let session = session();

        let report = create_new_assets(&session, &schemas, "old", "new", ReplicationOptions::new())
            .await
            .unwrap();

        assert!(session
            .recorded()
            .iter()
            .all(|s| s.kind == StatementKind::Execute && s.sql.starts_with("CREATE SCHEMA")));
        assert_eq!(report.schemas_ensured, vec!["sales", "empty"]);
        assert_eq!(report.skipped.len(), 3);
        assert_eq!(report.skipped[0].reason, SkipReason::Unsupported);
    }

    #[tokio::test]
    async fn test_rerun_is_safe() {
        let session = session();
        let options = ReplicationOptions::new().with_managed(true);
        let schemas = mixed_schemas();

        create_new_assets(&session, &schemas, "old", "new", options).await.unwrap();
        create_new_assets(&session, &schemas, "old", "new", options).await.unwrap();

        assert_eq!(session.count_matching("CREATE SCHEMA IF NOT EXISTS"), 2);
    }

    #[tokio::test]
    async fn test_schema_creation_failure_propagates() {
        let session = MockSession::new().with_failure(
            "CREATE SCHEMA",
            SessionError::statement("CREATE SCHEMA", "permission denied"),
        );

        let err = create_new_assets(&session, &mixed_schemas(), "old", "new", ReplicationOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Session(SessionError::Statement { .. })));
    }
}
