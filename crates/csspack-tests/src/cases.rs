//! Case discovery and the build-then-compare runner.
//!
//! A case is a subdirectory of the cases root:
//!
//! ```text
//! cases/<name>/index.js               entry (default configuration)
//! cases/<name>/csspack.config.json    optional configuration
//! cases/<name>/expected/*             golden files
//! ```
//!
//! Each case builds into `<output root>/js/<name>`, which is cleared first,
//! and its output is compared with the golden files and the snapshot store.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use csspack_engine::{BuildConfig, BuildError, Compiler, Stats};
use csspack_optimize::{instantiate, ProcessorError};
use csspack_spec::{
    merge_case_config, validate_config, ConfigError, ConfigSpec, ErrorCode, ForcedFields,
    ValidationError,
};

use crate::compare::{compare_outputs, CompareMode, ComparisonReport};
use crate::error::CaseError;
use crate::fixtures::{CASE_CONFIG_FILE, CASE_ENTRY_FILE, EXPECTED_DIR, OUTPUT_JS_DIR};
use crate::snapshot::SnapshotStore;

/// Case names containing this marker are never run.
pub const SKIP_MARKER: &str = "_skip_";

/// Environment variable holding a comma-separated list of cases to run.
pub const CASES_ENV: &str = "CSSPACK_CASES";

/// Returns true if the case is excluded by name.
pub fn is_skipped(name: &str) -> bool {
    name.contains(SKIP_MARKER)
}

/// A discovered case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Case name (directory name).
    pub name: String,
    /// Case directory; the build context.
    pub dir: PathBuf,
    /// Golden files directory (may not exist).
    pub expected_dir: PathBuf,
    /// Case configuration, if the case has one.
    pub config_path: Option<PathBuf>,
}

impl TestCase {
    /// Loads the case `name` under `root`.
    ///
    /// Returns `None` unless the directory exists and holds an entry file or
    /// a case configuration.
    pub fn load(root: &Path, name: &str) -> Option<Self> {
        let dir = root.join(name);
        if !dir.is_dir() {
            return None;
        }
        let config_path = dir.join(CASE_CONFIG_FILE);
        let config_path = config_path.is_file().then_some(config_path);
        if config_path.is_none() && !dir.join(CASE_ENTRY_FILE).is_file() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            expected_dir: dir.join(EXPECTED_DIR),
            dir,
            config_path,
        })
    }

    /// Parses the case configuration, if any.
    pub fn load_config(&self) -> Result<Option<ConfigSpec>, ConfigError> {
        self.config_path
            .as_deref()
            .map(ConfigSpec::from_file)
            .transpose()
    }
}

/// Lists case names under `root`, sorted, skip-marked cases excluded.
pub fn discover_cases(root: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_skipped(&name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Parses a comma-separated case list, dropping blanks.
pub fn parse_case_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads the case list from [`CASES_ENV`].
pub fn cases_from_env() -> Option<Vec<String>> {
    std::env::var(CASES_ENV)
        .ok()
        .map(|v| parse_case_list(&v))
        .filter(|cases| !cases.is_empty())
}

/// Resolves which cases to run: an explicit selection replaces discovery.
/// Skip-marked names are excluded either way.
pub fn select_cases(root: &Path, selection: Option<Vec<String>>) -> io::Result<Vec<String>> {
    match selection {
        Some(names) => Ok(names.into_iter().filter(|n| !is_skipped(n)).collect()),
        None => discover_cases(root),
    }
}

/// Runs a build and waits for its single completion signal.
pub fn run_to_completion(config: BuildConfig) -> Result<Stats, BuildError> {
    let mut completion = None;
    Compiler::new(config).run(|result| completion = Some(result));
    completion.unwrap_or_else(|| unreachable!("Compiler::run reports completion exactly once"))
}

/// A case that passed.
#[derive(Debug)]
pub struct CaseOutcome {
    /// Case name.
    pub case: String,
    /// Directory the case built into.
    pub output_dir: PathBuf,
    /// Build stats.
    pub stats: Stats,
    /// The (passing) comparison.
    pub report: ComparisonReport,
}

/// Runs cases from one cases root.
#[derive(Debug, Clone)]
pub struct CaseSuite {
    cases_root: PathBuf,
    output_root: PathBuf,
    store: SnapshotStore,
    compare_mode: CompareMode,
}

impl CaseSuite {
    /// Creates a suite.
    ///
    /// Relative roots are resolved against the working directory here, since
    /// case builds require an absolute context and output path.
    pub fn new(
        cases_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        store: SnapshotStore,
    ) -> Self {
        Self {
            cases_root: absolutize(cases_root.into()),
            output_root: absolutize(output_root.into()),
            store,
            compare_mode: CompareMode::default(),
        }
    }

    /// Sets the comparison mode.
    pub fn with_compare_mode(mut self, mode: CompareMode) -> Self {
        self.compare_mode = mode;
        self
    }

    /// Cases root.
    pub fn cases_root(&self) -> &Path {
        &self.cases_root
    }

    /// Build output directory of a case.
    pub fn case_output_dir(&self, name: &str) -> PathBuf {
        self.output_root.join(OUTPUT_JS_DIR).join(name)
    }

    /// Builds the effective configuration of a case.
    ///
    /// The case configuration (or the default one) is the base; `context`
    /// and `output` are always replaced by the case directory and the case
    /// output directory.
    pub fn build_config(&self, case: &TestCase) -> Result<BuildConfig, CaseError> {
        let base = case
            .load_config()
            .map_err(|e| CaseError::invocation(&case.name, e))?;
        let forced = ForcedFields::for_case(&case.dir, self.case_output_dir(&case.name));
        let spec = merge_case_config(base, &forced);

        validate_config(&spec)
            .into_result()
            .map_err(|e| CaseError::invocation(&case.name, e))?;
        instantiate(spec).map_err(|e| CaseError::invocation(&case.name, plugin_config_error(e)))
    }

    /// Builds one case and compares its output.
    pub fn run_case(&self, name: &str) -> Result<CaseOutcome, CaseError> {
        let case = TestCase::load(&self.cases_root, name).ok_or_else(|| CaseError::NotFound {
            case: name.to_string(),
            root: self.cases_root.clone(),
        })?;
        let config = self.build_config(&case)?;

        let output_dir = self.case_output_dir(name);
        clear_dir(&output_dir).map_err(|e| CaseError::invocation(name, e))?;

        let stats = run_to_completion(config).map_err(|e| CaseError::invocation(name, e))?;
        if stats.has_errors() {
            return Err(CaseError::BuildDiagnostics {
                case: name.to_string(),
                stats,
            });
        }

        let report = compare_outputs(
            name,
            &case.expected_dir,
            &output_dir,
            &self.store,
            self.compare_mode,
        );
        if !report.passed() {
            return Err(CaseError::FixtureMismatch(report));
        }

        Ok(CaseOutcome {
            case: name.to_string(),
            output_dir,
            stats,
            report,
        })
    }

    /// Runs every case, continuing past failures.
    pub fn run_all(&self, names: &[String]) -> SuiteReport {
        SuiteReport {
            results: names
                .iter()
                .map(|name| (name.clone(), self.run_case(name)))
                .collect(),
        }
    }
}

/// Resolves `path` against the working directory when it is relative.
///
/// If the working directory cannot be read the path is kept as given and
/// build validation reports it.
pub fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}

fn plugin_config_error(error: ProcessorError) -> ConfigError {
    let code = match &error {
        ProcessorError::InvalidAssetPattern { .. } => ErrorCode::InvalidAssetPattern,
        ProcessorError::InvalidOption { .. }
        | ProcessorError::Syntax { .. }
        | ProcessorError::Failed(_) => ErrorCode::InvalidPluginConfig,
    };
    ConfigError::Invalid(vec![ValidationError::with_path(
        code,
        error.to_string(),
        "plugins",
    )])
}

fn clear_dir(dir: &Path) -> Result<(), BuildError> {
    let clear = || -> io::Result<()> {
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        fs::create_dir_all(dir)
    };
    clear().map_err(|source| BuildError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Results of a suite run, in run order.
#[derive(Debug, Default)]
pub struct SuiteReport {
    /// One result per case.
    pub results: Vec<(String, Result<CaseOutcome, CaseError>)>,
}

impl SuiteReport {
    /// Whether every case passed.
    pub fn passed(&self) -> bool {
        self.results.iter().all(|(_, r)| r.is_ok())
    }

    /// Failing cases.
    pub fn failures(&self) -> Vec<&CaseError> {
        self.results
            .iter()
            .filter_map(|(_, r)| r.as_ref().err())
            .collect()
    }

    /// Number of passing cases.
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.is_ok()).count()
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, result) in &self.results {
            match result {
                Ok(_) => writeln!(f, "PASS {}", name)?,
                Err(e) => writeln!(f, "FAIL {}\n{}", name, e)?,
            }
        }
        write!(
            f,
            "{} passed, {} failed",
            self.passed_count(),
            self.results.len() - self.passed_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_skip_marker() {
        assert!(is_skipped("broken_skip_"));
        assert!(is_skipped("_skip_legacy"));
        assert!(!is_skipped("skip"));
    }

    #[test]
    fn test_parse_case_list() {
        assert_eq!(parse_case_list(" a, b,,c "), vec!["a", "b", "c"]);
        assert!(parse_case_list(" , ").is_empty());
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let root = tempfile::tempdir().unwrap();
        for name in ["zeta", "alpha", "old_skip_"] {
            fs::create_dir(root.path().join(name)).unwrap();
        }
        fs::write(root.path().join("README"), "").unwrap();

        assert_eq!(discover_cases(root.path()).unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_selection_replaces_discovery_but_skips_apply() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("a")).unwrap();
        let selected = select_cases(
            root.path(),
            Some(vec!["b".to_string(), "c_skip_".to_string()]),
        )
        .unwrap();
        assert_eq!(selected, vec!["b"]);
    }

    #[test]
    fn test_relative_roots_are_resolved_against_cwd() {
        let store = SnapshotStore::new("/snapshots", crate::SnapshotMode::Verify);
        let suite = CaseSuite::new("cases", "out", store);
        let cwd = std::env::current_dir().unwrap();

        assert_eq!(suite.cases_root(), cwd.join("cases"));
        assert_eq!(suite.case_output_dir("plain"), cwd.join("out/js/plain"));
        assert!(suite.case_output_dir("plain").is_absolute());

        let store = SnapshotStore::new("/snapshots", crate::SnapshotMode::Verify);
        let absolute = CaseSuite::new("/cases", "/out", store);
        assert_eq!(absolute.cases_root(), Path::new("/cases"));
    }

    #[test]
    fn test_plugin_errors_keep_their_kind() {
        let codes = |error: ProcessorError| match plugin_config_error(error) {
            ConfigError::Invalid(errors) => errors.into_iter().map(|e| e.code).collect::<Vec<_>>(),
            other => panic!("unexpected config error: {:?}", other),
        };

        assert_eq!(
            codes(ProcessorError::InvalidAssetPattern {
                pattern: "(".to_string(),
                message: "unclosed group".to_string(),
            }),
            vec![ErrorCode::InvalidAssetPattern]
        );
        assert_eq!(
            codes(ProcessorError::invalid_option("discardComments", "expected an object")),
            vec![ErrorCode::InvalidPluginConfig]
        );
        assert_eq!(
            codes(ProcessorError::Failed("boom".to_string())),
            vec![ErrorCode::InvalidPluginConfig]
        );
    }

    #[test]
    fn test_load_requires_entry_or_config() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("empty")).unwrap();
        fs::create_dir(root.path().join("configured")).unwrap();
        fs::write(
            root.path().join("configured").join(CASE_CONFIG_FILE),
            r#"{"entry": "./main.js"}"#,
        )
        .unwrap();

        assert!(TestCase::load(root.path(), "empty").is_none());
        assert!(TestCase::load(root.path(), "missing").is_none());
        let case = TestCase::load(root.path(), "configured").unwrap();
        assert!(case.load_config().unwrap().is_some());
    }
}
