//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Apply `DbOptions` before returning a usable connection.
//!
//! # Invariants
//! - Options are validated before any file is touched.
//! - Open failures are logged with duration and error code, then returned.

use super::{DbOptions, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::Instant;

/// Opens a SQLite database file with default `DbOptions`.
///
/// # Side effects
/// - Creates the file when it does not exist.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_db_with_options(path, &DbOptions::default())
}

/// Opens a SQLite database file with caller-provided options.
pub fn open_db_with_options(path: impl AsRef<Path>, options: &DbOptions) -> DbResult<Connection> {
    options.validate()?;
    open_with("file", options, || Connection::open(path))
}

/// Opens an in-memory SQLite database with default `DbOptions`.
///
/// Every call returns an isolated, empty database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", &DbOptions::default(), Connection::open_in_memory)
}

fn open_with(
    mode: &str,
    options: &DbOptions,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let conn = match open() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match configure_connection(&conn, options) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_configure_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.into())
        }
    }
}

fn configure_connection(conn: &Connection, options: &DbOptions) -> rusqlite::Result<()> {
    let foreign_keys = if options.foreign_keys { "ON" } else { "OFF" };
    conn.execute_batch(&format!("PRAGMA foreign_keys = {foreign_keys};"))?;
    conn.busy_timeout(options.busy_timeout)?;
    Ok(())
}
