//! CLI command implementations

pub mod build;
pub mod cases;
pub mod json_output;
