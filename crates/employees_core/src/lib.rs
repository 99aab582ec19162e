//! Core persistence for the employees app.
//! This crate is the single source of truth for employee record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::employee::{
    parse_salary, parse_salary_threshold, Employee, EmployeeId, EmployeeValidationError,
    NewEmployee, SearchFragment, TextField,
};
pub use repo::employee_repo::{
    EmployeeRepository, RepoError, RepoResult, SqliteEmployeeRepository,
};
pub use service::employee_service::EmployeeService;
pub use store::{EmployeeStore, StoreError, StoreResult, STORE_FILE_NAME};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
