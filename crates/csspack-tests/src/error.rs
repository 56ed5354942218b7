//! Case failure taxonomy.

use std::path::PathBuf;

use csspack_engine::{BuildError, Stats};
use csspack_spec::PipelineError;
use thiserror::Error;

use crate::compare::ComparisonReport;

/// Why a case failed.
#[derive(Debug, Error)]
pub enum CaseError {
    /// The case directory is missing or has neither an entry file nor a
    /// case configuration.
    #[error("case '{case}' not found under {}", root.display())]
    NotFound { case: String, root: PathBuf },

    /// The build could not run; no comparison was made.
    #[error("case '{case}': build could not run: {source}")]
    BuildInvocation {
        case: String,
        #[source]
        source: BuildError,
    },

    /// The build ran but reported errors; no comparison was made.
    #[error("case '{case}': build reported errors\n{stats}")]
    BuildDiagnostics { case: String, stats: Stats },

    /// The output did not match the golden files or snapshots.
    #[error("{0}")]
    FixtureMismatch(ComparisonReport),
}

impl CaseError {
    /// Name of the failing case.
    pub fn case(&self) -> &str {
        match self {
            CaseError::NotFound { case, .. }
            | CaseError::BuildInvocation { case, .. }
            | CaseError::BuildDiagnostics { case, .. } => case,
            CaseError::FixtureMismatch(report) => &report.case,
        }
    }

    pub(crate) fn invocation(case: &str, source: impl Into<BuildError>) -> Self {
        CaseError::BuildInvocation {
            case: case.to_string(),
            source: source.into(),
        }
    }
}

impl PipelineError for CaseError {
    fn code(&self) -> &'static str {
        match self {
            CaseError::NotFound { .. } => "CASE_001",
            CaseError::BuildInvocation { .. } => "CASE_002",
            CaseError::BuildDiagnostics { .. } => "CASE_003",
            CaseError::FixtureMismatch(_) => "CASE_004",
        }
    }

    fn category(&self) -> &'static str {
        "case"
    }
}
