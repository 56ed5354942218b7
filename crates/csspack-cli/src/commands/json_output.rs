//! JSON output types for machine-readable CLI output.
//!
//! Used by the `--json` flag on `build` and `cases`.

use csspack_engine::{Diagnostic, Stats};
use csspack_spec::PipelineError;
use csspack_tests::{CaseError, SuiteReport};
use serde::{Deserialize, Serialize};

/// Error codes for CLI operations.
///
/// Library errors pass their own codes through (`CONFIG_002`, `CASE_003`, ...).
pub mod error_codes {
    /// The build reported error diagnostics
    pub const BUILD_DIAGNOSTIC: &str = "CLI_001";
    /// The cases root could not be read
    pub const CASES_ROOT: &str = "CLI_002";
    /// A path given on the command line could not be resolved
    pub const PATH_RESOLVE: &str = "CLI_003";
}

/// Warning codes for CLI operations.
pub mod warning_codes {
    /// The build reported a warning diagnostic
    pub const BUILD_WARNING: &str = "CLI_W001";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "CONFIG_002")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Who raised it: plugin name, module id or `compilation` (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// File the error refers to (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            origin: None,
            file: None,
        }
    }

    /// Sets the origin for this error.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Converts any library error carrying a stable code.
    pub fn from_pipeline(error: &dyn PipelineError) -> Self {
        Self::new(error.code(), error.message())
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g., "CLI_W001")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
    /// Who raised it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

/// Converts an error diagnostic.
pub fn diagnostic_error_to_json(diagnostic: &Diagnostic) -> JsonError {
    JsonError::new(error_codes::BUILD_DIAGNOSTIC, &diagnostic.message).with_origin(&diagnostic.origin)
}

/// Converts a warning diagnostic.
pub fn diagnostic_warning_to_json(diagnostic: &Diagnostic) -> JsonWarning {
    JsonWarning {
        code: warning_codes::BUILD_WARNING.to_string(),
        message: diagnostic.message.clone(),
        origin: Some(diagnostic.origin.clone()),
    }
}

/// Output of `csspack build --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOutput {
    /// Whether the build ran and reported no errors
    pub success: bool,
    /// Load failures and error diagnostics
    pub errors: Vec<JsonError>,
    /// Warning diagnostics
    pub warnings: Vec<JsonWarning>,
    /// Build details (when the build ran)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<BuildResult>,
}

/// Details of a build that ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildResult {
    /// BLAKE3 digest over emitted assets
    pub hash: String,
    /// Directory assets were written to
    pub output_path: String,
    /// Emitted assets, sorted by name
    pub assets: Vec<BuildAsset>,
    /// Log lines raised by plugins
    pub logs: Vec<String>,
}

/// One emitted asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildAsset {
    pub name: String,
    pub size: usize,
    pub origin: String,
}

impl BuildOutput {
    /// Output for a build that could not start.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            warnings: Vec::new(),
            result: None,
        }
    }

    /// Output for a build that ran; success depends on its diagnostics.
    pub fn from_stats(stats: &Stats) -> Self {
        Self {
            success: !stats.has_errors(),
            errors: stats.errors().into_iter().map(diagnostic_error_to_json).collect(),
            warnings: stats
                .warnings()
                .into_iter()
                .map(diagnostic_warning_to_json)
                .collect(),
            result: Some(BuildResult {
                hash: stats.hash.clone(),
                output_path: stats.output_path.display().to_string(),
                assets: stats
                    .assets
                    .iter()
                    .map(|a| BuildAsset {
                        name: a.name.clone(),
                        size: a.size,
                        origin: a.origin.clone(),
                    })
                    .collect(),
                logs: stats
                    .logs()
                    .into_iter()
                    .map(|d| format!("{}: {}", d.origin, d.message))
                    .collect(),
            }),
        }
    }
}

/// Output of `csspack cases --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CasesOutput {
    /// Whether every selected case passed
    pub success: bool,
    /// Number of passing cases
    pub passed: usize,
    /// Number of failing cases
    pub failed: usize,
    /// Per-case results in run order
    pub cases: Vec<CaseResult>,
    /// Errors that prevented the suite from running
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
}

/// Result of one case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    /// Case name
    pub name: String,
    /// Whether the case passed
    pub passed: bool,
    /// Why it failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
    /// Files that did not match (fixture mismatches only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_files: Vec<String>,
}

impl CasesOutput {
    /// Output for a suite that could not start.
    pub fn failure(error: JsonError) -> Self {
        Self {
            success: false,
            passed: 0,
            failed: 0,
            cases: Vec::new(),
            errors: vec![error],
        }
    }

    /// Summarizes a suite run.
    pub fn from_report(report: &SuiteReport) -> Self {
        let cases: Vec<CaseResult> = report
            .results
            .iter()
            .map(|(name, result)| match result {
                Ok(_) => CaseResult {
                    name: name.clone(),
                    passed: true,
                    error: None,
                    failed_files: Vec::new(),
                },
                Err(e) => CaseResult {
                    name: name.clone(),
                    passed: false,
                    error: Some(JsonError::from_pipeline(e)),
                    failed_files: failed_files(e),
                },
            })
            .collect();

        Self {
            success: report.passed(),
            passed: report.passed_count(),
            failed: cases.len() - report.passed_count(),
            cases,
            errors: Vec::new(),
        }
    }
}

fn failed_files(error: &CaseError) -> Vec<String> {
    match error {
        CaseError::FixtureMismatch(report) => report
            .failures()
            .into_iter()
            .map(|f| f.name.clone())
            .chain(report.unexpected.iter().cloned())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csspack_engine::{AssetInfo, Severity};
    use pretty_assertions::assert_eq;

    fn stats() -> Stats {
        Stats {
            hash: "abc".to_string(),
            output_path: "/out".into(),
            assets: vec![AssetInfo {
                name: "main.css".to_string(),
                size: 3,
                origin: "extract-css".to_string(),
            }],
            diagnostics: vec![
                Diagnostic::new(Severity::Error, "./index.js", "Module not found"),
                Diagnostic::new(Severity::Warning, "compilation", "heads up"),
                Diagnostic::new(Severity::Log, "optimize-css-assets", "main.css: 5 -> 3 bytes"),
            ],
        }
    }

    #[test]
    fn test_build_output_from_stats() {
        let output = BuildOutput::from_stats(&stats());
        assert!(!output.success);
        assert_eq!(
            output.errors,
            vec![JsonError::new(error_codes::BUILD_DIAGNOSTIC, "Module not found")
                .with_origin("./index.js")]
        );
        assert_eq!(output.warnings[0].code, warning_codes::BUILD_WARNING);

        let result = output.result.unwrap();
        assert_eq!(result.assets[0].name, "main.css");
        assert_eq!(
            result.logs,
            vec!["optimize-css-assets: main.css: 5 -> 3 bytes".to_string()]
        );
    }

    #[test]
    fn test_json_error_skips_empty_fields() {
        let json = serde_json::to_value(JsonError::new("CLI_002", "gone")).unwrap();
        assert_eq!(json, serde_json::json!({"code": "CLI_002", "message": "gone"}));
    }

    #[test]
    fn test_cases_output_counts() {
        let report = SuiteReport {
            results: vec![(
                "ghost".to_string(),
                Err(CaseError::NotFound {
                    case: "ghost".to_string(),
                    root: "/cases".into(),
                }),
            )],
        };
        let output = CasesOutput::from_report(&report);
        assert!(!output.success);
        assert_eq!((output.passed, output.failed), (0, 1));
        assert_eq!(output.cases[0].error.as_ref().unwrap().code, "CASE_001");
    }
}
