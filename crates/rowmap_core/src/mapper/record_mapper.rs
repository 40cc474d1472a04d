//! Generic record mapper contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/insert/update/delete/select-all for any `Record` type.
//! - Map record attributes to columns and result rows back to records.
//!
//! # Invariants
//! - Each operation issues at most one statement on the borrowed connection.
//! - Statements are finalized before the operation returns, on every path.
//! - Update/delete on a missing key affect zero rows and are not errors.
//! - Errors are returned to the caller and never logged here.

use crate::db::DbError;
use crate::mapper::sql;
use crate::model::record::{Record, Value};
use crate::model::shape::{AttributeDescriptor, AttributeType, RecordShape};
use log::debug;
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::time::Instant;

pub type MapperResult<T> = Result<T, MapperError>;

/// Error taxonomy for record mapping.
#[derive(Debug)]
pub enum MapperError {
    /// The record shape has no attribute flagged as primary key.
    NoPrimaryKeyDefined { record: &'static str },
    /// More than one attribute is flagged as primary key.
    DuplicatePrimaryKey {
        record: &'static str,
        first: &'static str,
        second: &'static str,
    },
    /// An attribute type has no column mapping.
    UnsupportedAttributeType {
        attribute: &'static str,
        attribute_type: AttributeType,
    },
    /// A name (usually a result column) matches no record attribute.
    AttributeNotFound {
        record: &'static str,
        attribute: String,
    },
    /// An empty record instance could not be created.
    Instantiation { record: &'static str, reason: String },
    /// Statement execution or value conversion failed.
    Database(DbError),
}

impl MapperError {
    /// Returns whether the error stems from the record declaration rather
    /// than from executing SQL.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Database(_))
    }
}

impl Display for MapperError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPrimaryKeyDefined { record } => {
                write!(f, "record `{record}` has no primary key attribute")
            }
            Self::DuplicatePrimaryKey {
                record,
                first,
                second,
            } => write!(
                f,
                "record `{record}` flags both `{first}` and `{second}` as primary key"
            ),
            Self::UnsupportedAttributeType {
                attribute,
                attribute_type,
            } => write!(
                f,
                "attribute `{attribute}` has unsupported type `{attribute_type}`"
            ),
            Self::AttributeNotFound { record, attribute } => {
                write!(f, "record `{record}` has no attribute `{attribute}`")
            }
            Self::Instantiation { record, reason } => {
                write!(f, "cannot instantiate record `{record}`: {reason}")
            }
            Self::Database(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MapperError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Database(err) => Some(err),
            Self::NoPrimaryKeyDefined { .. }
            | Self::DuplicatePrimaryKey { .. }
            | Self::UnsupportedAttributeType { .. }
            | Self::AttributeNotFound { .. }
            | Self::Instantiation { .. } => None,
        }
    }
}

impl From<DbError> for MapperError {
    fn from(value: DbError) -> Self {
        Self::Database(value)
    }
}

impl From<rusqlite::Error> for MapperError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Database(DbError::Sqlite(value))
    }
}

/// Repository interface for mapping one record type onto one table.
pub trait RecordRepository<R: Record> {
    /// Creates the table for `R`. Fails if the table already exists.
    fn create_table(&self) -> MapperResult<()>;
    /// Inserts `record` and writes the generated key back into it.
    ///
    /// The key type is checked before any SQL runs. The row is committed
    /// before the write-back, so a generated key that overflows the key
    /// field (an `i32` key past `i32::MAX`) returns an error while the row
    /// stays in the table. Use an `i64` key for tables that may grow that far.
    fn insert(&self, record: &mut R) -> MapperResult<()>;
    /// Updates the row keyed by `record`'s primary key; returns rows affected.
    fn update(&self, record: &R) -> MapperResult<usize>;
    /// Deletes the row keyed by `record`'s primary key; returns rows affected.
    fn delete(&self, record: &R) -> MapperResult<usize>;
    /// Loads every row, projected onto `columns` (all columns when empty).
    fn select_all(&self, columns: &[&str]) -> MapperResult<Vec<R>>;
}

/// SQLite-backed record mapper bound to one table.
pub struct SqliteRecordMapper<'conn, R> {
    conn: &'conn Connection,
    table: String,
    _record: PhantomData<fn() -> R>,
}

impl<'conn, R: Record> SqliteRecordMapper<'conn, R> {
    pub fn new(conn: &'conn Connection, table: impl Into<String>) -> Self {
        Self {
            conn,
            table: table.into(),
            _record: PhantomData,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl<R: Record> RecordRepository<R> for SqliteRecordMapper<'_, R> {
    fn create_table(&self) -> MapperResult<()> {
        let shape = R::shape();
        let sql = sql::create_table_sql(&self.table, &shape)?;

        let started_at = Instant::now();
        self.conn.execute(&sql, [])?;
        debug!(
            "event=table_create module=mapper status=ok table={} record={} columns={} duration_ms={}",
            self.table,
            shape.record,
            shape.attributes().len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn insert(&self, record: &mut R) -> MapperResult<()> {
        let shape = R::shape();
        let primary_key = shape.primary_key()?;
        let sql = sql::insert_sql(&self.table, &shape)?;
        let values = value_attributes(record, &shape)?;

        let started_at = Instant::now();
        let generated: Option<Value> = self
            .conn
            .query_row(&sql, params_from_iter(values), |row| row.get(0))
            .optional()?;

        let key_assigned = generated.is_some();
        if let Some(key) = generated {
            record.set(primary_key.name, key)?;
        }
        debug!(
            "event=record_insert module=mapper status=ok table={} key_assigned={} duration_ms={}",
            self.table,
            key_assigned,
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn update(&self, record: &R) -> MapperResult<usize> {
        let shape = R::shape();
        let primary_key = shape.primary_key()?;
        let Some(sql) = sql::update_sql(&self.table, &shape)? else {
            debug!(
                "event=record_update module=mapper status=skipped table={} reason=no_value_attributes",
                self.table
            );
            return Ok(0);
        };

        let mut values = value_attributes(record, &shape)?;
        values.push(read_attribute(record, &shape, primary_key)?);

        let started_at = Instant::now();
        let changed = self.conn.execute(&sql, params_from_iter(values))?;
        debug!(
            "event=record_update module=mapper status=ok table={} rows={} duration_ms={}",
            self.table,
            changed,
            started_at.elapsed().as_millis()
        );
        Ok(changed)
    }

    fn delete(&self, record: &R) -> MapperResult<usize> {
        let shape = R::shape();
        let primary_key = shape.primary_key()?;
        let sql = sql::delete_sql(&self.table, &shape)?;
        let key = read_attribute(record, &shape, primary_key)?;

        let started_at = Instant::now();
        let changed = self.conn.execute(&sql, [key])?;
        debug!(
            "event=record_delete module=mapper status=ok table={} rows={} duration_ms={}",
            self.table,
            changed,
            started_at.elapsed().as_millis()
        );
        Ok(changed)
    }

    fn select_all(&self, columns: &[&str]) -> MapperResult<Vec<R>> {
        let sql = sql::select_sql(&self.table, columns);

        let started_at = Instant::now();
        let mut stmt = self.conn.prepare(&sql)?;
        let column_names = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = R::instantiate()?;
            for (index, name) in column_names.iter().enumerate() {
                let value: Value = row.get(index)?;
                record.set(name, value)?;
            }
            records.push(record);
        }

        debug!(
            "event=record_select module=mapper status=ok table={} columns={} rows={} duration_ms={}",
            self.table,
            column_names.len(),
            records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(records)
    }
}

fn value_attributes<R: Record>(record: &R, shape: &RecordShape) -> MapperResult<Vec<Value>> {
    shape
        .value_attributes()
        .map(|attr| read_attribute(record, shape, attr))
        .collect()
}

fn read_attribute<R: Record>(
    record: &R,
    shape: &RecordShape,
    attr: &AttributeDescriptor,
) -> MapperResult<Value> {
    record
        .get(attr.name)
        .ok_or_else(|| MapperError::AttributeNotFound {
            record: shape.record,
            attribute: attr.name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::MapperError;
    use crate::db::DbError;
    use crate::model::shape::AttributeType;
    use std::error::Error;

    #[test]
    fn configuration_errors_are_distinguished_from_database_errors() {
        let no_key = MapperError::NoPrimaryKeyDefined { record: "Person" };
        assert!(no_key.is_configuration());
        assert!(no_key.source().is_none());
        assert_eq!(no_key.to_string(), "record `Person` has no primary key attribute");

        let unsupported = MapperError::UnsupportedAttributeType {
            attribute: "score",
            attribute_type: AttributeType::Real,
        };
        assert!(unsupported.is_configuration());
        assert_eq!(
            unsupported.to_string(),
            "attribute `score` has unsupported type `real`"
        );

        let db: MapperError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(!db.is_configuration());
        assert!(matches!(db, MapperError::Database(DbError::Sqlite(_))));
        assert!(db.source().is_some());
    }
}
