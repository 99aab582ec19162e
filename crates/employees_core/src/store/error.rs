//! Error taxonomy surfaced by [`super::EmployeeStore`].

use crate::db::DbError;
use crate::model::employee::EmployeeValidationError;
use crate::repo::employee_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Distinguishable failure kinds for store callers.
#[derive(Debug)]
pub enum StoreError {
    /// Caller input failed a precondition; the store was not touched.
    Validation(EmployeeValidationError),
    /// The local store could not be opened or created.
    StoreUnavailable(DbError),
    /// Table creation failed on a usable handle.
    Schema(DbError),
    /// Insert statement failed.
    Write(RepoError),
    /// Query failed or returned rows that violate model invariants.
    Read(RepoError),
    /// A previous caller panicked while holding the handle.
    Poisoned,
}

impl StoreError {
    /// Stable snake_case code for callers that branch on the kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::Schema(_) => "schema_error",
            Self::Write(_) => "write_error",
            Self::Read(_) => "read_error",
            Self::Poisoned => "store_poisoned",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid input: {err}"),
            Self::StoreUnavailable(err) => write!(f, "store unavailable: {err}"),
            Self::Schema(err) => write!(f, "schema creation failed: {err}"),
            Self::Write(err) => write!(f, "write failed: {err}"),
            Self::Read(err) => write!(f, "read failed: {err}"),
            Self::Poisoned => write!(f, "store handle is poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::StoreUnavailable(err) => Some(err),
            Self::Schema(err) => Some(err),
            Self::Write(err) => Some(err),
            Self::Read(err) => Some(err),
            Self::Poisoned => None,
        }
    }
}

impl From<EmployeeValidationError> for StoreError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}
