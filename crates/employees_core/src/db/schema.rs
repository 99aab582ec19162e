//! `employees` table definition.
//!
//! # Invariants
//! - `ensure_schema` only creates the table when it is absent.
//! - `id` uses `AUTOINCREMENT`, so assigned ids are never reused.

use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::time::Instant;

/// Name of the single table owned by the employees core.
pub const EMPLOYEES_TABLE: &str = "employees";

const CREATE_EMPLOYEES_SQL: &str = include_str!("schema.sql");

/// Creates the `employees` table if it does not exist yet.
///
/// Safe to call any number of times on the same connection.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    let started_at = Instant::now();
    match conn.execute_batch(CREATE_EMPLOYEES_SQL) {
        Ok(()) => {
            info!(
                "event=schema_ensure module=db status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=schema_ensure module=db status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.into())
        }
    }
}

/// Returns whether a table named `table_name` exists.
pub fn table_exists(conn: &Connection, table_name: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table_name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
