//! Record-to-table mapping over a borrowed SQLite connection.
//!
//! # Responsibility
//! - Derive table schemas from record shapes.
//! - Run create/insert/update/delete/select-all for any `Record` type.
//!
//! # Invariants
//! - Configuration errors are raised before any statement reaches SQLite.
//! - Attribute values are always bound as parameters, never spliced into SQL.

pub mod record_mapper;
pub mod sql;

pub use record_mapper::{MapperError, MapperResult, RecordRepository, SqliteRecordMapper};
