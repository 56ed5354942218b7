//! csspack CLI library.
//!
//! Command implementations behind the `csspack` binary: one-off builds from a
//! JSON config and golden-fixture case runs.

pub mod commands;
