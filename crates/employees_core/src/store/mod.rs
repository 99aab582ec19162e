//! Process-level owner of the employees database handle.
//!
//! # Responsibility
//! - Open the local store lazily, exactly once, and reuse the handle.
//! - Expose create/insert/query operations with a typed error taxonomy.
//!
//! # Invariants
//! - Validation runs before the handle is opened or touched.
//! - Concurrent first use triggers a single open (`OnceCell::get_or_try_init`).
//! - All statements are serialized through one `Mutex<Connection>`.

mod error;

pub use error::{StoreError, StoreResult};

use crate::db::{ensure_schema, open_db, open_db_in_memory};
use crate::model::employee::{
    Employee, EmployeeId, EmployeeValidationError, NewEmployee, SearchFragment, TextField,
};
use crate::repo::employee_repo::{EmployeeRepository, RepoError, SqliteEmployeeRepository};
use log::{info, warn};
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Logical file name of the employees store.
pub const STORE_FILE_NAME: &str = "funcionarios.db";

#[derive(Debug, Clone, PartialEq, Eq)]
enum StoreLocation {
    File(PathBuf),
    Memory,
}

/// Lazily opened employees store.
///
/// Construct once at application start and share by reference.
pub struct EmployeeStore {
    location: StoreLocation,
    handle: OnceCell<Mutex<Connection>>,
}

impl EmployeeStore {
    /// Store backed by the file at `path`. Nothing is opened yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
            handle: OnceCell::new(),
        }
    }

    /// Store backed by `dir/funcionarios.db`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(STORE_FILE_NAME))
    }

    /// Store backed by a private in-memory database.
    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::Memory,
            handle: OnceCell::new(),
        }
    }

    /// File path of the store, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            StoreLocation::File(path) => Some(path.as_path()),
            StoreLocation::Memory => None,
        }
    }

    /// Whether the handle has been opened.
    pub fn is_open(&self) -> bool {
        self.handle.get().is_some()
    }

    /// Opens the store on first call and returns the cached handle afterwards.
    ///
    /// A failed open leaves the store unopened; the next call tries again.
    pub fn ensure_open(&self) -> StoreResult<&Mutex<Connection>> {
        self.handle.get_or_try_init(|| -> StoreResult<Mutex<Connection>> {
            let conn = match &self.location {
                StoreLocation::File(path) => open_db(path),
                StoreLocation::Memory => open_db_in_memory(),
            }
            .map_err(StoreError::StoreUnavailable)?;
            info!("event=store_open module=store status=ok");
            Ok(Mutex::new(conn))
        })
    }

    /// Creates the `employees` table if it does not exist.
    pub fn ensure_schema(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        ensure_schema(&conn).map_err(StoreError::Schema)
    }

    /// Inserts one employee and returns the assigned id.
    pub fn insert(&self, employee: &NewEmployee) -> StoreResult<EmployeeId> {
        employee.validate()?;
        let conn = self.lock()?;
        SqliteEmployeeRepository::new(&conn)
            .insert_employee(employee)
            .map_err(StoreError::from_write)
    }

    /// Returns every row.
    pub fn list_all(&self) -> StoreResult<Vec<Employee>> {
        let conn = self.lock()?;
        SqliteEmployeeRepository::new(&conn)
            .list_employees()
            .map_err(StoreError::from_read)
    }

    /// Rows whose `name` contains `fragment` (trimmed, case-sensitive).
    pub fn find_by_name_contains(&self, fragment: &str) -> StoreResult<Vec<Employee>> {
        let fragment = SearchFragment::parse(TextField::Name, fragment)?;
        let conn = self.lock()?;
        SqliteEmployeeRepository::new(&conn)
            .find_by_name_contains(&fragment)
            .map_err(StoreError::from_read)
    }

    /// Rows with `salary >= threshold`.
    pub fn find_by_salary_at_least(&self, threshold: f64) -> StoreResult<Vec<Employee>> {
        if !threshold.is_finite() {
            return Err(StoreError::Validation(
                EmployeeValidationError::InvalidThreshold(threshold.to_string()),
            ));
        }
        let conn = self.lock()?;
        SqliteEmployeeRepository::new(&conn)
            .find_by_salary_at_least(threshold)
            .map_err(StoreError::from_read)
    }

    /// Rows whose `role` contains `fragment` (trimmed, case-sensitive).
    pub fn find_by_role_contains(&self, fragment: &str) -> StoreResult<Vec<Employee>> {
        let fragment = SearchFragment::parse(TextField::Role, fragment)?;
        let conn = self.lock()?;
        SqliteEmployeeRepository::new(&conn)
            .find_by_role_contains(&fragment)
            .map_err(StoreError::from_read)
    }

    /// Number of stored rows.
    pub fn count(&self) -> StoreResult<u64> {
        let conn = self.lock()?;
        SqliteEmployeeRepository::new(&conn)
            .count_employees()
            .map_err(StoreError::from_read)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        let handle = self.ensure_open()?;
        handle.lock().map_err(|_| {
            warn!("event=store_lock module=store status=error error_code=lock_poisoned");
            StoreError::Poisoned
        })
    }
}

impl std::fmt::Debug for EmployeeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmployeeStore")
            .field("location", &self.location)
            .field("open", &self.is_open())
            .finish()
    }
}

impl StoreError {
    fn from_write(err: RepoError) -> Self {
        match err {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Write(other),
        }
    }

    fn from_read(err: RepoError) -> Self {
        match err {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Read(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EmployeeStore, StoreError, STORE_FILE_NAME};
    use crate::model::employee::NewEmployee;
    use rusqlite::Connection;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::{Arc, Mutex};
    use std::thread;

    #[test]
    fn construction_does_not_open() {
        let store = EmployeeStore::in_memory();
        assert!(!store.is_open());
        assert!(store.path().is_none());
    }

    #[test]
    fn ensure_open_returns_same_handle() {
        let store = EmployeeStore::in_memory();
        let first = store.ensure_open().unwrap();
        let second = store.ensure_open().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn in_dir_uses_logical_store_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = EmployeeStore::in_dir(dir.path());
        assert_eq!(store.path(), Some(dir.path().join(STORE_FILE_NAME).as_path()));
    }

    #[test]
    fn validation_does_not_open_the_store() {
        let store = EmployeeStore::in_memory();
        let err = store
            .insert(&NewEmployee::new("", 10.0, "Analyst"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(!store.is_open());

        let err = store.find_by_name_contains("   ").unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(!store.is_open());
    }

    #[test]
    fn panic_while_holding_handle_reports_poisoned() {
        let store = EmployeeStore::in_memory();
        store.ensure_schema().unwrap();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = store.ensure_open().unwrap().lock().unwrap();
            panic!("caller failed mid-statement");
        }));
        assert!(outcome.is_err());

        let err = store.list_all().unwrap_err();
        assert!(matches!(err, StoreError::Poisoned));
        assert_eq!(err.kind(), "store_poisoned");
    }

    #[test]
    fn concurrent_first_use_opens_once() {
        let store = Arc::new(EmployeeStore::in_memory());
        let handles = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let handle: *const Mutex<Connection> = store.ensure_open().unwrap();
                    handle as usize
                })
            })
            .collect::<Vec<_>>();

        let addresses = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>();
        assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));

        // Every thread saw the same in-memory database.
        store.ensure_schema().unwrap();
        store
            .insert(&NewEmployee::new("Ana", 1.0, "Analyst"))
            .unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }
}
