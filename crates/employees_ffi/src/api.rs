//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose one function per screen action (connect, create table, insert,
//!   list, search by name/salary/role).
//! - Turn typed core errors into display-ready envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One `EmployeeStore` per process, configured at most once.
//! - Inserting never refreshes a list; the UI asks for it explicitly.

use employees_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Employee, EmployeeService, EmployeeStore, StoreError, StoreResult, STORE_FILE_NAME,
};
use log::warn;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const STORE_DIR_ENV: &str = "EMPLOYEES_DB_DIR";
const NO_RESULTS_MESSAGE: &str = "No employees found.";
static STORE: OnceLock<EmployeeStore> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Sync call; may create the log directory.
/// - Safe to repeat with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Selects the absolute directory that holds `funcionarios.db`.
///
/// # FFI contract
/// - Must run before the first store call to take effect.
/// - Repeating with the same directory is a no-op.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store(db_dir: String) -> String {
    let dir = match normalize_store_dir(db_dir.as_str()) {
        Ok(dir) => dir,
        Err(err) => return err,
    };
    let requested = dir.join(STORE_FILE_NAME);
    let store = STORE.get_or_init(|| EmployeeStore::new(requested.clone()));

    match store.path() {
        Some(active) if active == requested.as_path() => String::new(),
        Some(active) => format!(
            "store already configured at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        ),
        None => "store already configured in memory".to_string(),
    }
}

/// Outcome of a write or setup action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Created employee id, insert only.
    pub employee_id: Option<i64>,
    /// Human-readable message for the status line or alert.
    pub message: String,
    /// Stable error code (`validation_error`, `store_unavailable`, ...).
    pub error_kind: Option<String>,
}

impl ActionResponse {
    fn success(message: impl Into<String>, employee_id: Option<i64>) -> Self {
        Self {
            ok: true,
            employee_id,
            message: message.into(),
            error_kind: None,
        }
    }

    fn failure(action: &str, err: &StoreError) -> Self {
        Self {
            ok: false,
            employee_id: None,
            message: format!("{action} failed: {err}"),
            error_kind: Some(err.kind().to_string()),
        }
    }
}

/// One list row.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeItem {
    pub id: i64,
    pub name: String,
    pub salary: f64,
    pub role: String,
    /// Preformatted `name - R$salary - role` line.
    pub display: String,
}

/// List/search envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeListResponse {
    pub items: Vec<EmployeeItem>,
    /// Summary, or the no-results notice, or the error text.
    pub message: String,
    pub error_kind: Option<String>,
}

/// Opens or creates the store (connect screen).
///
/// # FFI contract
/// - Sync call, may create `funcionarios.db`.
/// - Never panics; failure carries `error_kind = store_unavailable`.
#[flutter_rust_bridge::frb(sync)]
pub fn connect_store() -> ActionResponse {
    match service().connect() {
        Ok(()) => ActionResponse::success("Database connected.", None),
        Err(err) => ActionResponse::failure("connect_store", &err),
    }
}

/// Creates the `employees` table if needed (create-table screen).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Idempotent; safe to call on every screen mount.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn create_table() -> ActionResponse {
    match service().create_table() {
        Ok(()) => ActionResponse::success("Table \"employees\" is ready.", None),
        Err(err) => ActionResponse::failure("create_table", &err),
    }
}

/// Inserts one employee from raw form fields.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - `salary` accepts `.` or `,` as decimal separator.
/// - Invalid input returns `error_kind = validation_error` without touching the DB.
/// - Returns the created employee id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn insert_employee(name: String, salary: String, role: String) -> ActionResponse {
    match service().register(&name, &salary, &role) {
        Ok(id) => ActionResponse::success("Employee added.", Some(id.get())),
        Err(err) => ActionResponse::failure("insert_employee", &err),
    }
}

/// Lists every employee.
///
/// # FFI contract
/// - Sync call, DB-backed, read-only.
/// - Empty table yields the no-results notice, not an error.
#[flutter_rust_bridge::frb(sync)]
pub fn list_employees() -> EmployeeListResponse {
    to_list_response("list_employees", service().list_all())
}

/// Searches employees whose name contains `text` (trimmed, case-sensitive).
///
/// # FFI contract
/// - Sync call, DB-backed, read-only.
/// - Blank `text` returns `error_kind = validation_error`.
/// - No match yields the no-results notice, not an error.
#[flutter_rust_bridge::frb(sync)]
pub fn search_by_name(text: String) -> EmployeeListResponse {
    to_list_response("search_by_name", service().search_by_name(&text))
}

/// Searches employees earning at least the number typed in `text`.
///
/// # FFI contract
/// - Sync call, DB-backed, read-only.
/// - Boundary is inclusive.
/// - Non-numeric `text` returns `error_kind = validation_error`.
#[flutter_rust_bridge::frb(sync)]
pub fn search_by_salary(text: String) -> EmployeeListResponse {
    to_list_response("search_by_salary", service().search_by_salary(&text))
}

/// Searches employees whose role contains `text` (trimmed, case-sensitive).
///
/// # FFI contract
/// - Sync call, DB-backed, read-only.
/// - Blank `text` returns `error_kind = validation_error`.
/// - No match yields the no-results notice, not an error.
#[flutter_rust_bridge::frb(sync)]
pub fn search_by_role(text: String) -> EmployeeListResponse {
    to_list_response("search_by_role", service().search_by_role(&text))
}

fn service() -> EmployeeService<'static> {
    EmployeeService::new(store())
}

fn store() -> &'static EmployeeStore {
    STORE.get_or_init(|| EmployeeStore::in_dir(default_store_dir()))
}

fn default_store_dir() -> PathBuf {
    if let Ok(raw) = std::env::var(STORE_DIR_ENV) {
        match normalize_store_dir(&raw) {
            Ok(dir) => return dir,
            Err(err) => warn!("event=store_config module=ffi status=ignored error={err}"),
        }
    }
    std::env::temp_dir()
}

fn normalize_store_dir(raw: &str) -> Result<PathBuf, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("db_dir cannot be empty".to_string());
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(format!("db_dir must be an absolute path, got `{trimmed}`"));
    }
    Ok(path.to_path_buf())
}

fn to_list_response(action: &str, result: StoreResult<Vec<Employee>>) -> EmployeeListResponse {
    match result {
        Ok(rows) => {
            let message = if rows.is_empty() {
                NO_RESULTS_MESSAGE.to_string()
            } else {
                format!("Found {} employee(s).", rows.len())
            };
            EmployeeListResponse {
                items: rows.into_iter().map(to_item).collect(),
                message,
                error_kind: None,
            }
        }
        Err(err) => EmployeeListResponse {
            items: Vec::new(),
            message: format!("{action} failed: {err}"),
            error_kind: Some(err.kind().to_string()),
        },
    }
}

fn to_item(employee: Employee) -> EmployeeItem {
    EmployeeItem {
        id: employee.id.get(),
        display: employee.display_line(),
        name: employee.name,
        salary: employee.salary,
        role: employee.role,
    }
}
