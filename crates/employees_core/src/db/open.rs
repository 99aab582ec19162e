//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//! - Probe the connection once so a broken file fails at open time.
//!
//! # Invariants
//! - Returned connections have a busy timeout configured.
//! - Returned connections answered `PRAGMA user_version`.

use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) a SQLite database file.
///
/// Missing parent directories are created first.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    if let Err(err) = ensure_parent_dir(path) {
        error!(
            "event=db_open module=db status=error mode=file duration_ms={} error_code=db_dir_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err);
    }

    let conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(conn, "file", started_at)
}

/// Opens an in-memory SQLite database.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let conn = match Connection::open_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(conn, "memory", started_at)
}

fn finish_open(conn: Connection, mode: &str, started_at: Instant) -> DbResult<Connection> {
    match bootstrap_connection(&conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    // A file that is not a database only fails on first read, not on open.
    conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, i64>(0))?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> DbResult<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent.exists() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|source| DbError::Io {
        path: parent.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{open_db, open_db_in_memory};
    use crate::db::DbError;

    #[test]
    fn in_memory_connection_is_usable() {
        let conn = open_db_in_memory().expect("in-memory open should succeed");
        let value: i64 = conn
            .query_row("SELECT 1 + 1;", [], |row| row.get(0))
            .expect("query should succeed");
        assert_eq!(value, 2);
    }

    #[test]
    fn open_db_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("deeper").join("store.db");

        open_db(&path).expect("open should create parents");
        assert!(path.exists());
    }

    #[test]
    fn open_db_rejects_file_that_is_not_a_database() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("garbage.db");
        std::fs::write(&path, vec![0x42_u8; 4096]).expect("write garbage");

        let err = open_db(&path).expect_err("garbage file must not open");
        assert!(matches!(err, DbError::Sqlite(_)));
    }

    #[test]
    fn open_db_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a dir").expect("write blocker");

        let err = open_db(blocker.join("store.db")).expect_err("open must fail");
        assert!(matches!(err, DbError::Sqlite(_) | DbError::Io { .. }));
    }
}
