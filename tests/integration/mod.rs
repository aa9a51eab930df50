//! Library-level integration tests.

pub mod config_test;
pub mod field_test;
pub mod remote_test;
