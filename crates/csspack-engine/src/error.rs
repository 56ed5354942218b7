//! Error types for the build engine.
//!
//! A [`BuildError`] means the build could not run at all. Problems found
//! while the build runs (missing modules, loader failures, plugin failures)
//! are not errors here; they are collected as diagnostics in the stats.

use std::path::PathBuf;

use csspack_spec::{ConfigError, PipelineError};
use thiserror::Error;

/// The build engine failed to run.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The configuration is not buildable.
    #[error("invalid build configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The output directory could not be created.
    #[error("failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An asset could not be written.
    #[error("failed to emit asset {}: {source}", path.display())]
    Emit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError for BuildError {
    fn code(&self) -> &'static str {
        match self {
            BuildError::InvalidConfig(_) => "BUILD_001",
            BuildError::OutputDir { .. } => "BUILD_002",
            BuildError::Emit { .. } => "BUILD_003",
        }
    }

    fn category(&self) -> &'static str {
        "build"
    }
}

/// A plugin hook failed.
///
/// The compiler records this as an error diagnostic attributed to the plugin;
/// it never aborts the build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{plugin}: {message}")]
pub struct PluginError {
    /// Name of the failing plugin.
    pub plugin: String,
    /// What went wrong.
    pub message: String,
}

impl PluginError {
    /// Creates a plugin error.
    pub fn new(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            message: message.into(),
        }
    }
}

impl PipelineError for PluginError {
    fn code(&self) -> &'static str {
        "BUILD_004"
    }

    fn category(&self) -> &'static str {
        "plugin"
    }
}
