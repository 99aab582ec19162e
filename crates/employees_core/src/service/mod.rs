//! Core use-case services.
//!
//! # Responsibility
//! - Turn raw screen input into validated store calls.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod employee_service;
