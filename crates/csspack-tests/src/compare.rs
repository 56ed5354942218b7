//! Output comparison against golden files and snapshots.

use std::fmt;
use std::path::Path;

use similar::TextDiff;

use crate::fixtures::{list_files, read_file_or_empty};
use crate::snapshot::{SnapshotError, SnapshotOutcome, SnapshotStore, UPDATE_SNAPSHOTS_ENV};

/// Which files take part in a comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompareMode {
    /// Only files present in the expected directory are compared; extra
    /// output files are ignored.
    #[default]
    ExpectedOnly,
    /// Additionally, every output file without an expected counterpart is a
    /// failure.
    Exact,
}

/// Comparison of a single file.
#[derive(Debug)]
pub struct FileComparison {
    /// Name relative to the expected directory.
    pub name: String,
    /// Expected text (`""` if unreadable).
    pub expected: String,
    /// Actual text (`""` if the build did not produce it).
    pub actual: String,
    /// Result of the snapshot check on the actual text.
    pub snapshot: Result<SnapshotOutcome, SnapshotError>,
}

impl FileComparison {
    /// Exact string equality of expected and actual.
    pub fn content_matches(&self) -> bool {
        self.expected == self.actual
    }

    /// Whether the snapshot check passed.
    pub fn snapshot_matches(&self) -> bool {
        matches!(&self.snapshot, Ok(outcome) if !outcome.is_failure())
    }

    /// Whether both checks passed.
    pub fn passed(&self) -> bool {
        self.content_matches() && self.snapshot_matches()
    }

    /// Unified diff from expected to actual.
    pub fn diff(&self) -> String {
        unified_diff(&self.expected, &self.actual, "expected", "actual")
    }
}

/// All file comparisons of one case.
#[derive(Debug, Default)]
pub struct ComparisonReport {
    /// Case name.
    pub case: String,
    /// One entry per expected file, sorted by name.
    pub files: Vec<FileComparison>,
    /// Output files without an expected counterpart (only in
    /// [`CompareMode::Exact`]).
    pub unexpected: Vec<String>,
}

impl ComparisonReport {
    /// Whether every check passed.
    pub fn passed(&self) -> bool {
        self.unexpected.is_empty() && self.files.iter().all(|f| f.passed())
    }

    /// Files that failed at least one check.
    pub fn failures(&self) -> Vec<&FileComparison> {
        self.files.iter().filter(|f| !f.passed()).collect()
    }

    /// Number of failing entries, unexpected files included.
    pub fn failure_count(&self) -> usize {
        self.failures().len() + self.unexpected.len()
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "case '{}': {} of {} file(s) failed",
            self.case,
            self.failure_count(),
            self.files.len() + self.unexpected.len()
        )?;

        for file in self.failures() {
            if !file.content_matches() {
                writeln!(f, "--- {}: output differs from expected", file.name)?;
                write!(f, "{}", file.diff())?;
            }
            match &file.snapshot {
                Ok(SnapshotOutcome::Missing { path }) => writeln!(
                    f,
                    "--- {}: snapshot missing at {} (rerun with {}=1 to create it)",
                    file.name,
                    path.display(),
                    UPDATE_SNAPSHOTS_ENV
                )?,
                Ok(SnapshotOutcome::Mismatch { path, snapshot }) => {
                    writeln!(
                        f,
                        "--- {}: output differs from snapshot {}",
                        file.name,
                        path.display()
                    )?;
                    write!(
                        f,
                        "{}",
                        unified_diff(snapshot, &file.actual, "snapshot", "actual")
                    )?;
                }
                Ok(_) => {}
                Err(e) => writeln!(f, "--- {}: {}", file.name, e)?,
            }
        }

        for name in &self.unexpected {
            writeln!(f, "--- {}: produced but not expected", name)?;
        }
        Ok(())
    }
}

/// Line diff in unified format.
pub fn unified_diff(old: &str, new: &str, old_label: &str, new_label: &str) -> String {
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(old_label, new_label)
        .to_string()
}

/// Compares the files of `expected_dir` with those in `actual_dir`.
///
/// Every expected file is checked twice: for exact equality with the actual
/// file, and against the snapshot store under `case`. All files are checked
/// before the report is returned. A missing `expected_dir` means no
/// expectations.
pub fn compare_outputs(
    case: &str,
    expected_dir: &Path,
    actual_dir: &Path,
    store: &SnapshotStore,
    mode: CompareMode,
) -> ComparisonReport {
    let expected_files = list_files(expected_dir);

    let files = expected_files
        .iter()
        .map(|name| {
            let expected = read_file_or_empty(&expected_dir.join(name));
            let actual = read_file_or_empty(&actual_dir.join(name));
            let snapshot = store.check(case, name, &actual);
            FileComparison {
                name: name.clone(),
                expected,
                actual,
                snapshot,
            }
        })
        .collect();

    let unexpected = match mode {
        CompareMode::ExpectedOnly => Vec::new(),
        CompareMode::Exact => list_files(actual_dir)
            .into_iter()
            .filter(|name| !expected_files.contains(name))
            .collect(),
    };

    ComparisonReport {
        case: case.to_string(),
        files,
        unexpected,
    }
}
