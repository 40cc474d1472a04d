//! Generic record-to-table mapping over SQLite.
//!
//! Records describe themselves through the [`Record`] trait (usually via
//! [`define_record!`]); a [`SqliteRecordMapper`] turns that description into
//! `CREATE TABLE`, `INSERT`, `UPDATE`, `DELETE` and `SELECT` statements.

pub mod db;
pub mod logging;
pub mod mapper;
pub mod model;

pub use db::{open_db, open_db_in_memory, open_db_with_options, DbError, DbOptions, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use mapper::{MapperError, MapperResult, RecordRepository, SqliteRecordMapper};
pub use model::record::{FieldValue, Record, Value};
pub use model::shape::{AttributeDescriptor, AttributeType, RecordShape};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
