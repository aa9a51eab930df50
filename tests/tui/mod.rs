//! Binary-level tests for headless mode.

mod common;
mod headless_test;
