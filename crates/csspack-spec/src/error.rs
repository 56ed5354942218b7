//! Error types for build configuration loading and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error codes for configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// C001: No entry points declared
    NoEntries,
    /// C002: Invalid chunk name
    InvalidChunkName,
    /// C003: Empty entry request
    EmptyEntryRequest,
    /// C004: Context directory missing or not absolute
    InvalidContext,
    /// C005: Output descriptor missing
    MissingOutput,
    /// C006: Unsafe output filename template
    UnsafeOutputFilename,
    /// C007: Output directory missing or not absolute
    InvalidOutputPath,
    /// C008: Rule test is not a valid regular expression
    InvalidRuleTest,
    /// C009: Rule declares an empty loader chain
    EmptyLoaderChain,
    /// C010: Unsafe extraction destination filename
    UnsafeExtractFilename,
    /// C011: Invalid asset name pattern for the optimize plugin
    InvalidAssetPattern,
    /// C012: Plugin descriptor could not be turned into a plugin
    InvalidPluginConfig,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "C001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::NoEntries => "C001",
            ErrorCode::InvalidChunkName => "C002",
            ErrorCode::EmptyEntryRequest => "C003",
            ErrorCode::InvalidContext => "C004",
            ErrorCode::MissingOutput => "C005",
            ErrorCode::UnsafeOutputFilename => "C006",
            ErrorCode::InvalidOutputPath => "C007",
            ErrorCode::InvalidRuleTest => "C008",
            ErrorCode::EmptyLoaderChain => "C009",
            ErrorCode::UnsafeExtractFilename => "C010",
            ErrorCode::InvalidAssetPattern => "C011",
            ErrorCode::InvalidPluginConfig => "C012",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// JSON path to the problematic field (e.g., "module.rules\[0\].test").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error with a JSON path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Result of configuration validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Creates an empty (passing) validation result.
    pub fn success() -> Self {
        Self::default()
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts to a Result, returning Err if there are errors.
    pub fn into_result(self) -> Result<(), ConfigError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(self.errors))
        }
    }
}

/// Top-level error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Processor options were not a JSON object.
    #[error("processor options must be a JSON object, got {0}")]
    OptionsNotObject(String),

    /// The configuration failed validation.
    #[error("config validation failed with {} error(s): {}", .0.len(), join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Common trait for errors raised anywhere in the pipeline.
///
/// Every crate in the workspace implements this for its error types so the
/// CLI and the case harness can report failures with stable codes without
/// depending on each error enum directly.
pub trait PipelineError: std::error::Error {
    /// Stable code such as "CONFIG_001" or "BUILD_002".
    fn code(&self) -> &'static str;

    /// Human-readable message; defaults to `Display`.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Grouping category ("config", "build", "processor", "case").
    fn category(&self) -> &'static str;
}

impl PipelineError for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "CONFIG_001",
            ConfigError::JsonParse(_) => "CONFIG_002",
            ConfigError::OptionsNotObject(_) => "CONFIG_003",
            ConfigError::Invalid(_) => "CONFIG_004",
        }
    }

    fn category(&self) -> &'static str {
        "config"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_strings() {
        assert_eq!(ErrorCode::NoEntries.code(), "C001");
        assert_eq!(ErrorCode::InvalidAssetPattern.to_string(), "C011");
        assert_eq!(ErrorCode::InvalidPluginConfig.code(), "C012");
    }

    #[test]
    fn test_validation_error_display() {
        let plain = ValidationError::new(ErrorCode::NoEntries, "no entry points");
        assert_eq!(plain.to_string(), "C001: no entry points");

        let pathed = ValidationError::with_path(
            ErrorCode::InvalidRuleTest,
            "unclosed group",
            "module.rules[0].test",
        );
        assert_eq!(
            pathed.to_string(),
            "C008: unclosed group (at module.rules[0].test)"
        );
    }

    #[test]
    fn test_validation_result_into_result() {
        assert!(ValidationResult::success().into_result().is_ok());

        let mut result = ValidationResult::success();
        result.add_error(ValidationError::new(ErrorCode::MissingOutput, "missing"));
        assert!(!result.is_ok());

        let err = result.into_result().unwrap_err();
        assert_eq!(err.code(), "CONFIG_004");
        assert!(err.to_string().contains("C005: missing"));
    }
}
