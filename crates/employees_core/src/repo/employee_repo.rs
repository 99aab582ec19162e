//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert and filtered read APIs over the `employees` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `NewEmployee::validate()` before SQL mutations.
//! - Read paths never mutate the table.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Substring matching is case-sensitive (`instr`), with no wildcard syntax.

use crate::db::DbError;
use crate::model::employee::{
    Employee, EmployeeId, EmployeeValidationError, NewEmployee, SearchFragment, TextField,
};
use log::{debug, error};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    name,
    salary,
    role
FROM employees";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for employee persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EmployeeValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for employee rows.
pub trait EmployeeRepository {
    fn insert_employee(&self, employee: &NewEmployee) -> RepoResult<EmployeeId>;
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
    fn find_by_name_contains(&self, fragment: &SearchFragment) -> RepoResult<Vec<Employee>>;
    fn find_by_salary_at_least(&self, threshold: f64) -> RepoResult<Vec<Employee>>;
    fn find_by_role_contains(&self, fragment: &SearchFragment) -> RepoResult<Vec<Employee>>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Returns the number of stored rows.
    pub fn count_employees(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM employees;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }

    fn select(
        &self,
        op: &'static str,
        filter: Option<(&str, Value)>,
    ) -> RepoResult<Vec<Employee>> {
        let started_at = Instant::now();
        let result = self.select_inner(filter);
        match &result {
            Ok(rows) => debug!(
                "event=employee_{} module=repo status=ok rows={} duration_ms={}",
                op,
                rows.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=employee_{} module=repo status=error duration_ms={} error={}",
                op,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn select_inner(&self, filter: Option<(&str, Value)>) -> RepoResult<Vec<Employee>> {
        let mut sql = String::from(EMPLOYEE_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some((predicate, value)) = filter {
            sql.push_str(" WHERE ");
            sql.push_str(predicate);
            bind_values.push(value);
        }

        sql.push_str(" ORDER BY id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }

    fn find_text_contains(
        &self,
        op: &'static str,
        expected: TextField,
        fragment: &SearchFragment,
    ) -> RepoResult<Vec<Employee>> {
        if fragment.field() != expected {
            return Err(RepoError::Validation(
                EmployeeValidationError::FragmentFieldMismatch {
                    expected,
                    actual: fragment.field(),
                },
            ));
        }
        let predicate = match expected {
            TextField::Name => "instr(name, ?1) > 0",
            TextField::Role => "instr(role, ?1) > 0",
        };
        self.select(
            op,
            Some((predicate, Value::Text(fragment.as_str().to_string()))),
        )
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn insert_employee(&self, employee: &NewEmployee) -> RepoResult<EmployeeId> {
        employee.validate()?;

        let started_at = Instant::now();
        let inserted = self.conn.execute(
            "INSERT INTO employees (
                name,
                salary,
                role
            ) VALUES (?1, ?2, ?3);",
            params![
                employee.name.as_str(),
                employee.salary,
                employee.role.as_str()
            ],
        );

        match inserted {
            Ok(_) => {
                let id = EmployeeId(self.conn.last_insert_rowid());
                debug!(
                    "event=employee_insert module=repo status=ok id={} duration_ms={}",
                    id,
                    started_at.elapsed().as_millis()
                );
                Ok(id)
            }
            Err(err) => {
                error!(
                    "event=employee_insert module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        self.select("list", None)
    }

    fn find_by_name_contains(&self, fragment: &SearchFragment) -> RepoResult<Vec<Employee>> {
        self.find_text_contains("find_by_name", TextField::Name, fragment)
    }

    fn find_by_salary_at_least(&self, threshold: f64) -> RepoResult<Vec<Employee>> {
        if !threshold.is_finite() {
            return Err(RepoError::Validation(
                EmployeeValidationError::InvalidThreshold(threshold.to_string()),
            ));
        }
        self.select(
            "find_by_salary",
            Some(("salary >= ?1", Value::Real(threshold))),
        )
    }

    fn find_by_role_contains(&self, fragment: &SearchFragment) -> RepoResult<Vec<Employee>> {
        self.find_text_contains("find_by_role", TextField::Role, fragment)
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let id: i64 = row.get("id")?;
    let salary: f64 = row.get("salary")?;
    if !salary.is_finite() || salary < 0.0 {
        return Err(RepoError::InvalidData(format!(
            "invalid salary `{salary}` in employees.salary for id {id}"
        )));
    }

    let employee = Employee {
        id: EmployeeId(id),
        name: row.get("name")?,
        salary,
        role: row.get("role")?,
    };
    if employee.name.trim().is_empty() || employee.role.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "blank name or role for employees.id {id}"
        )));
    }
    Ok(employee)
}
