//! csspack golden-fixture integration harness
//!
//! This crate drives the csspack build engine over fixture cases and checks
//! the emitted files:
//!
//! - **Cases**: each directory under `fixtures/cases` is built and its output
//!   compared with `expected/*` and the snapshot store
//! - **Processor adapter**: a fixed build exercising the processing hook
//!   contract (arguments in, stylesheet out)
//! - **Determinism**: repeated builds leave byte-identical output
//!
//! ## Running Tests
//!
//! ```bash
//! # Run every case
//! cargo test -p csspack-tests
//!
//! # Run selected cases
//! CSSPACK_CASES=basic,multi-entry cargo test -p csspack-tests --test case_integration
//!
//! # Rewrite snapshots from the current output
//! CSSPACK_UPDATE_SNAPSHOTS=1 cargo test -p csspack-tests --test case_integration
//! ```

pub mod adapter;
pub mod cases;
pub mod compare;
pub mod determinism;
pub mod error;
pub mod fixtures;
pub mod snapshot;

// Re-export commonly used items
pub use cases::{
    absolutize, cases_from_env, discover_cases, is_skipped, run_to_completion, select_cases, CaseOutcome,
    CaseSuite, SuiteReport, TestCase, CASES_ENV, SKIP_MARKER,
};
pub use compare::{compare_outputs, CompareMode, ComparisonReport, FileComparison};
pub use error::CaseError;
pub use fixtures::read_file_or_empty;
pub use snapshot::{SnapshotError, SnapshotMode, SnapshotOutcome, SnapshotStore};
