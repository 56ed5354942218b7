//! Error types for stylesheet processing.

use csspack_spec::PipelineError;
use thiserror::Error;

/// Result type for processor calls.
pub type ProcessorResult<T> = Result<T, ProcessorError>;

/// Errors raised by a [`crate::CssProcessor`] or while configuring the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessorError {
    /// The stylesheet could not be parsed.
    #[error("{source_name}:{line}: {message}")]
    Syntax {
        /// Asset or file the stylesheet came from.
        source_name: String,
        /// 1-based line of the problem.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// An option value has the wrong shape.
    #[error("invalid processor option '{name}': {message}")]
    InvalidOption {
        /// Option key.
        name: String,
        /// Error message.
        message: String,
    },

    /// The asset name pattern is not a valid regular expression.
    #[error("invalid asset name pattern '{pattern}': {message}")]
    InvalidAssetPattern {
        /// The pattern.
        pattern: String,
        /// Regex compiler message.
        message: String,
    },

    /// Any other processor failure.
    #[error("{0}")]
    Failed(String),
}

impl ProcessorError {
    /// Creates a syntax error.
    pub fn syntax(source_name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }

    /// Creates an invalid option error.
    pub fn invalid_option(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl PipelineError for ProcessorError {
    fn code(&self) -> &'static str {
        match self {
            ProcessorError::Syntax { .. } => "PROC_001",
            ProcessorError::InvalidOption { .. } => "PROC_002",
            ProcessorError::InvalidAssetPattern { .. } => "PROC_003",
            ProcessorError::Failed(_) => "PROC_004",
        }
    }

    fn category(&self) -> &'static str {
        "processor"
    }
}
