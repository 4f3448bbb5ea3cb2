//! catclone core - catalog discovery and replication.
//!
//! This crate walks the schema/table tree of a source catalog and replays it
//! into a destination catalog through a [`SqlSession`]. Managed tables are
//! deep-cloned; external tables are re-registered from their captured DDL.
//!
//! # Quick Start
//!
//! ```ignore
//! use catclone_core::{copy_catalog, CopyOptions};
//!
//! let options = CopyOptions::new().with_managed(true);
//! let report = copy_catalog(&session, "main", "main_clone", options).await?;
//! println!("{}", report.summary());
//! ```

pub mod ddl;
pub mod discovery;
pub mod error;
pub mod model;
pub mod replication;
pub mod report;
pub mod session;
pub mod sql;

mod copy;

pub use copy::{copy_catalog, CopyOptions};
pub use discovery::{build_asset_tree, discover_catalog, list_schemas};
pub use error::Error;
pub use model::{Catalog, Schema, Table, TableType};
pub use replication::{create_new_assets, ReplicationOptions};
pub use report::{CopyReport, SkipReason, SkippedTable};
pub use session::{DryRunSession, MockSession, Row, SessionError, SqlSession};
pub use sql::TableRef;
