//! Cases command implementation
//!
//! Runs golden-fixture cases and prints a per-case PASS/FAIL summary.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use csspack_tests::cases::parse_case_list;
use csspack_tests::{
    absolutize, cases_from_env, select_cases, CaseError, CaseSuite, CompareMode, SnapshotMode,
    SnapshotStore, SuiteReport,
};

use super::json_output::{error_codes, CasesOutput, JsonError};

/// Directory next to the cases root that holds snapshots by default.
pub const DEFAULT_SNAPSHOTS_DIR: &str = "snapshots";

/// Options for the cases command.
#[derive(Debug, Clone, Default)]
pub struct CasesOptions {
    /// Directory holding one subdirectory per case
    pub root: PathBuf,
    /// Build output root (a temp directory when absent)
    pub out: Option<PathBuf>,
    /// Snapshot root (`<root>/../snapshots` when absent)
    pub snapshots: Option<PathBuf>,
    /// Comma-separated case names; `CSSPACK_CASES` applies when absent
    pub cases: Option<String>,
    /// Rewrite snapshots instead of verifying them
    pub update_snapshots: bool,
    /// Also fail on produced files with no expectation
    pub strict: bool,
    /// Output machine-readable JSON
    pub json: bool,
}

impl CasesOptions {
    /// Options for running every case under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    fn snapshot_mode(&self) -> SnapshotMode {
        if self.update_snapshots {
            SnapshotMode::Update
        } else {
            SnapshotMode::from_env()
        }
    }

    fn compare_mode(&self) -> CompareMode {
        if self.strict {
            CompareMode::Exact
        } else {
            CompareMode::ExpectedOnly
        }
    }

    fn selection(&self) -> Option<Vec<String>> {
        match &self.cases {
            Some(list) => Some(parse_case_list(list)),
            None => cases_from_env(),
        }
    }
}

/// Run the cases command
///
/// # Returns
/// Exit code: 0 if every selected case passed, 1 otherwise
pub fn run(options: &CasesOptions) -> Result<ExitCode> {
    if options.json {
        run_json(options)
    } else {
        run_human(options)
    }
}

fn run_human(options: &CasesOptions) -> Result<ExitCode> {
    println!("{} {}", "Cases:".cyan().bold(), options.root.display());

    let report = run_suite(options)?;
    for (name, result) in &report.results {
        match result {
            Ok(_) => println!("{} {}", "PASS".green().bold(), name),
            Err(e) => {
                println!("{} {} {}", "FAIL".red().bold(), name, failure_kind(e).dimmed());
                println!("{}", e);
            }
        }
    }

    let failed = report.results.len() - report.passed_count();
    println!(
        "\n{} passed, {} failed",
        report.passed_count().to_string().green(),
        if failed > 0 {
            failed.to_string().red()
        } else {
            failed.to_string().normal()
        }
    );

    Ok(exit_code(&report))
}

fn run_json(options: &CasesOptions) -> Result<ExitCode> {
    let output = match run_suite(options) {
        Ok(report) => CasesOutput::from_report(&report),
        Err(e) => CasesOutput::failure(
            JsonError::new(error_codes::CASES_ROOT, format!("{:#}", e))
                .with_file(options.root.display().to_string()),
        ),
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize cases output")?
    );
    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Resolves paths, selects cases and runs them.
pub fn run_suite(options: &CasesOptions) -> Result<SuiteReport> {
    let root = options
        .root
        .canonicalize()
        .with_context(|| format!("Failed to resolve cases root: {}", options.root.display()))?;
    let snapshots = match &options.snapshots {
        Some(dir) => absolutize(dir.clone()),
        None => default_snapshots_dir(&root),
    };

    let names = select_cases(&root, options.selection())
        .with_context(|| format!("Failed to list cases under {}", root.display()))?;

    // Holds the scratch directory until the suite finishes.
    let scratch;
    let out = match &options.out {
        Some(dir) => absolutize(dir.clone()),
        None => {
            scratch = tempfile::tempdir().context("Failed to create output directory")?;
            scratch.path().to_path_buf()
        }
    };

    let store = SnapshotStore::new(snapshots, options.snapshot_mode());
    let suite = CaseSuite::new(root, out, store).with_compare_mode(options.compare_mode());
    Ok(suite.run_all(&names))
}

fn default_snapshots_dir(root: &Path) -> PathBuf {
    root.parent()
        .unwrap_or(root)
        .join(DEFAULT_SNAPSHOTS_DIR)
}

fn failure_kind(error: &CaseError) -> &'static str {
    match error {
        CaseError::NotFound { .. } => "(not found)",
        CaseError::BuildInvocation { .. } => "(build could not run)",
        CaseError::BuildDiagnostics { .. } => "(build errors)",
        CaseError::FixtureMismatch(_) => "(output mismatch)",
    }
}

fn exit_code(report: &SuiteReport) -> ExitCode {
    if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
