//! Flutter-facing FFI surface for the employees core.

pub mod api;
