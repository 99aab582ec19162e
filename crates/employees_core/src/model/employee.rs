//! Employee record, draft and input parsing.
//!
//! # Responsibility
//! - Define the persisted `Employee` row and the unsaved `NewEmployee` draft.
//! - Turn raw form text into validated values before any store access.
//!
//! # Invariants
//! - `name` and `role` are non-blank.
//! - `salary` is finite and non-negative.
//! - `EmployeeId` is assigned by the store and never changes.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub i64);

impl EmployeeId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for EmployeeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Searchable text column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Role,
}

impl TextField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Role => "role",
        }
    }
}

/// One row of the `employees` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub salary: f64,
    pub role: String,
}

impl Employee {
    /// Search-result row text: `name - R$salary - role`.
    pub fn display_line(&self) -> String {
        format!("{} - R${:.2} - {}", self.name, self.salary, self.role)
    }
}

/// Employee draft that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub name: String,
    pub salary: f64,
    pub role: String,
}

impl NewEmployee {
    /// Builds a draft from already-typed values. Call [`NewEmployee::validate`]
    /// before persisting.
    pub fn new(name: impl Into<String>, salary: f64, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            salary,
            role: role.into(),
        }
    }

    /// Builds a validated draft from raw form text.
    ///
    /// Name and role are trimmed. Salary accepts `,` as decimal separator.
    pub fn from_input(
        name: &str,
        salary: &str,
        role: &str,
    ) -> Result<Self, EmployeeValidationError> {
        let draft = Self {
            name: name.trim().to_string(),
            salary: parse_salary(salary)?,
            role: role.trim().to_string(),
        };
        draft.validate()?;
        Ok(draft)
    }

    /// Checks write invariants.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.name.trim().is_empty() {
            return Err(EmployeeValidationError::EmptyName);
        }
        if !self.salary.is_finite() || self.salary < 0.0 {
            return Err(EmployeeValidationError::InvalidSalary(self.salary.to_string()));
        }
        if self.role.trim().is_empty() {
            return Err(EmployeeValidationError::EmptyRole);
        }
        Ok(())
    }
}

/// Non-blank, trimmed substring used by name/role searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFragment {
    field: TextField,
    text: String,
}

impl SearchFragment {
    pub fn parse(field: TextField, raw: &str) -> Result<Self, EmployeeValidationError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(EmployeeValidationError::EmptyFragment(field));
        }
        Ok(Self {
            field,
            text: text.to_string(),
        })
    }

    pub fn field(&self) -> TextField {
        self.field
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Validation failures raised before any store access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    EmptyName,
    EmptyRole,
    /// Salary text is not a finite, non-negative number.
    InvalidSalary(String),
    /// Salary threshold text is not a finite number.
    InvalidThreshold(String),
    EmptyFragment(TextField),
    /// Fragment parsed for one column was used to search another.
    FragmentFieldMismatch {
        expected: TextField,
        actual: TextField,
    },
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyRole => write!(f, "role must not be empty"),
            Self::InvalidSalary(value) => {
                write!(f, "salary must be a non-negative number, got `{value}`")
            }
            Self::InvalidThreshold(value) => {
                write!(f, "salary threshold must be a number, got `{value}`")
            }
            Self::EmptyFragment(field) => {
                write!(f, "{} search text must not be empty", field.as_str())
            }
            Self::FragmentFieldMismatch { expected, actual } => write!(
                f,
                "{} search text cannot be used for a {} search",
                actual.as_str(),
                expected.as_str()
            ),
        }
    }
}

impl Error for EmployeeValidationError {}

/// Parses salary form text into a finite, non-negative amount.
pub fn parse_salary(raw: &str) -> Result<f64, EmployeeValidationError> {
    let trimmed = raw.trim();
    match parse_decimal(trimmed) {
        Some(value) if value >= 0.0 => Ok(value),
        _ => Err(EmployeeValidationError::InvalidSalary(trimmed.to_string())),
    }
}

/// Parses a salary search threshold. Any finite number is accepted.
pub fn parse_salary_threshold(raw: &str) -> Result<f64, EmployeeValidationError> {
    let trimmed = raw.trim();
    parse_decimal(trimmed)
        .ok_or_else(|| EmployeeValidationError::InvalidThreshold(trimmed.to_string()))
}

fn parse_decimal(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    let normalized = if text.contains(',') && !text.contains('.') {
        text.replacen(',', ".", 1)
    } else {
        text.to_string()
    };
    // `f64::from_str` accepts "inf"/"NaN"; those are not amounts.
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::{
        parse_salary, parse_salary_threshold, Employee, EmployeeId, EmployeeValidationError,
        NewEmployee, SearchFragment, TextField,
    };

    #[test]
    fn from_input_trims_and_parses() {
        let draft = NewEmployee::from_input("  Ana ", " 1500.50 ", " Analyst ").unwrap();
        assert_eq!(draft.name, "Ana");
        assert_eq!(draft.salary, 1500.5);
        assert_eq!(draft.role, "Analyst");
    }

    #[test]
    fn salary_accepts_comma_decimal_separator() {
        assert_eq!(parse_salary("1234,5").unwrap(), 1234.5);
        assert_eq!(parse_salary("0").unwrap(), 0.0);
    }

    #[test]
    fn salary_rejects_negative_non_numeric_and_non_finite() {
        for raw in ["-1", "abc", "", "   ", "inf", "NaN", "1,2,3"] {
            let err = parse_salary(raw).unwrap_err();
            assert!(
                matches!(err, EmployeeValidationError::InvalidSalary(_)),
                "`{raw}` should be rejected"
            );
        }
    }

    #[test]
    fn threshold_allows_negative_but_not_text() {
        assert_eq!(parse_salary_threshold("-10").unwrap(), -10.0);
        assert!(matches!(
            parse_salary_threshold("lots"),
            Err(EmployeeValidationError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn validate_rejects_blank_fields() {
        assert_eq!(
            NewEmployee::new("", 100.0, "X").validate(),
            Err(EmployeeValidationError::EmptyName)
        );
        assert_eq!(
            NewEmployee::new("Y", 100.0, "  ").validate(),
            Err(EmployeeValidationError::EmptyRole)
        );
        assert!(matches!(
            NewEmployee::new("Y", -1.0, "X").validate(),
            Err(EmployeeValidationError::InvalidSalary(_))
        ));
        assert!(matches!(
            NewEmployee::new("Y", f64::NAN, "X").validate(),
            Err(EmployeeValidationError::InvalidSalary(_))
        ));
    }

    #[test]
    fn fragment_is_trimmed_and_must_not_be_blank() {
        let fragment = SearchFragment::parse(TextField::Name, "  Ana ").unwrap();
        assert_eq!(fragment.as_str(), "Ana");
        assert_eq!(fragment.field(), TextField::Name);

        let err = SearchFragment::parse(TextField::Role, " \t ").unwrap_err();
        assert_eq!(err, EmployeeValidationError::EmptyFragment(TextField::Role));
        assert_eq!(err.to_string(), "role search text must not be empty");
    }

    #[test]
    fn display_line_formats_two_decimals() {
        let employee = Employee {
            id: EmployeeId(7),
            name: "Ana".to_string(),
            salary: 1500.0,
            role: "Analyst".to_string(),
        };
        assert_eq!(employee.display_line(), "Ana - R$1500.00 - Analyst");
    }
}
