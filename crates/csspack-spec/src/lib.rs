//! csspack Build Configuration Library
//!
//! This crate provides the data side of a csspack build: configuration
//! types, the typed case-config merge, and validation.
//!
//! # Example
//!
//! ```
//! use csspack_spec::{ConfigSpec, EntrySpec, LoaderSpec, OutputSpec, RuleSpec};
//! use csspack_spec::validation::validate_for_build;
//!
//! let config = ConfigSpec::new(EntrySpec::named("test", "./index.js"))
//!     .with_context("/project/src")
//!     .with_output(OutputSpec::new("[name].js", "/project/dist"))
//!     .with_rule(RuleSpec::extract("\\.css$", LoaderSpec::Style, LoaderSpec::Css));
//!
//! assert!(validate_for_build(&config).is_ok());
//! ```
//!
//! # Modules
//!
//! - [`config`]: Entry, output, rule and plugin descriptors
//! - [`error`]: Validation and load errors, the shared [`PipelineError`] trait
//! - [`merge`]: Harness-forced field overlay with documented precedence
//! - [`options`]: Processor option maps and `from`/`to` forcing
//! - [`validation`]: Config validation

pub mod config;
pub mod error;
pub mod merge;
pub mod options;
pub mod validation;

pub use config::{
    render_filename, ConfigSpec, EntrySpec, LoaderSpec, ModuleSpec, OutputSpec, PluginSpec,
    RuleSpec, RuleUse, DEFAULT_CHUNK_NAME, NAME_PLACEHOLDER,
};
pub use error::{ConfigError, ErrorCode, PipelineError, ValidationError, ValidationResult};
pub use merge::{default_case_config, merge_case_config, ForcedFields};
pub use options::{ProcessorOptions, FROM_KEY, TO_KEY};
pub use validation::{
    is_safe_output_filename, is_valid_chunk_name, validate_config, validate_for_build,
};
