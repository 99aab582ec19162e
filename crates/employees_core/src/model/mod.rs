//! Employee domain model.
//!
//! # Responsibility
//! - Define the record shape stored in the `employees` table.
//! - Own input parsing and validation rules for writes and searches.
//!
//! # Invariants
//! - Every persisted employee is identified by a store-assigned `EmployeeId`.
//! - Rows are only created, never updated or deleted.

pub mod employee;
