//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from store/service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `NewEmployee::validate()` before persistence.
//! - Every value reaches SQL as a bound parameter.

pub mod employee_repo;
