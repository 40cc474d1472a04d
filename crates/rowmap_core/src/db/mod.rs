//! SQLite connection bootstrap for the record mapper.
//!
//! # Responsibility
//! - Open and configure SQLite connections handed to record mappers.
//! - Keep connection tuning (busy timeout, foreign keys) in one place.
//! - Define the storage error shared by bootstrap and record mapping.
//!
//! # Invariants
//! - A returned connection has every `DbOptions` setting applied.
//! - Connection acquisition never creates or alters application tables.

use rusqlite::types::FromSqlError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

mod open;

pub use open::{open_db, open_db_in_memory, open_db_with_options};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// A column value could not be converted into the attribute's Rust type.
    Conversion {
        attribute: String,
        source: FromSqlError,
    },
    InvalidOptions(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Conversion { attribute, source } => {
                write!(f, "cannot convert value for attribute `{attribute}`: {source}")
            }
            Self::InvalidOptions(message) => write!(f, "invalid connection options: {message}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Conversion { source, .. } => Some(source),
            Self::InvalidOptions(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Connection settings applied right after a database is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbOptions {
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
    /// Mirrors `PRAGMA foreign_keys`.
    pub foreign_keys: bool,
}

impl Default for DbOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
            foreign_keys: true,
        }
    }
}

impl DbOptions {
    /// Rejects settings SQLite cannot honor.
    ///
    /// # Errors
    /// - Returns `DbError::InvalidOptions` when `busy_timeout` exceeds
    ///   `i32::MAX` milliseconds.
    pub fn validate(&self) -> DbResult<()> {
        if self.busy_timeout.as_millis() > i32::MAX as u128 {
            return Err(DbError::InvalidOptions(format!(
                "busy_timeout of {}ms exceeds the supported maximum",
                self.busy_timeout.as_millis()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DbError, DbOptions};
    use std::time::Duration;

    #[test]
    fn default_options_are_valid() {
        let options = DbOptions::default();
        assert_eq!(options.busy_timeout, Duration::from_secs(5));
        assert!(options.foreign_keys);
        options.validate().expect("defaults should validate");
    }

    #[test]
    fn oversized_busy_timeout_is_rejected() {
        let options = DbOptions {
            busy_timeout: Duration::from_secs(u64::from(u32::MAX)),
            ..DbOptions::default()
        };
        let err = options.validate().expect_err("timeout should be rejected");
        assert!(matches!(err, DbError::InvalidOptions(_)));
        assert!(err.to_string().contains("busy_timeout"));
    }
}
