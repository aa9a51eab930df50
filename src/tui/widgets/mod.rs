//! TUI widgets for smart-complete.

pub mod header;
pub mod input;
pub mod results;
