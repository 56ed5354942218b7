//! Build configuration validation.

use regex::Regex;

use crate::config::{ConfigSpec, PluginSpec, RuleUse, NAME_PLACEHOLDER};
use crate::error::{ErrorCode, ValidationError, ValidationResult};

/// Checks that a configuration is complete enough to build.
///
/// Unlike [`validate_config`], this requires `context` and `output` to be
/// present, which is only true after the harness (or the CLI) has filled
/// them in.
pub fn validate_for_build(config: &ConfigSpec) -> ValidationResult {
    let mut result = validate_config(config);

    match &config.context {
        None => result.add_error(ValidationError::with_path(
            ErrorCode::InvalidContext,
            "context directory is required",
            "context",
        )),
        Some(context) if !context.is_absolute() => {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidContext,
                format!("context must be an absolute path: '{}'", context.display()),
                "context",
            ))
        }
        Some(_) => {}
    }

    match &config.output {
        None => result.add_error(ValidationError::with_path(
            ErrorCode::MissingOutput,
            "output descriptor is required",
            "output",
        )),
        Some(output) if !output.path.is_absolute() => {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidOutputPath,
                format!(
                    "output path must be an absolute path: '{}'",
                    output.path.display()
                ),
                "output.path",
            ))
        }
        Some(_) => {}
    }

    result
}

/// Validates the parts of a configuration that do not depend on where it
/// will be built.
pub fn validate_config(config: &ConfigSpec) -> ValidationResult {
    let mut result = ValidationResult::success();

    if config.entry.is_empty() {
        result.add_error(ValidationError::with_path(
            ErrorCode::NoEntries,
            "at least one entry point is required",
            "entry",
        ));
    }

    for (chunk, request) in config.entry.chunks() {
        if !is_valid_chunk_name(&chunk) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidChunkName,
                format!("chunk name must match [A-Za-z0-9_.-]+: '{}'", chunk),
                format!("entry.{}", chunk),
            ));
        }
        if request.trim().is_empty() {
            result.add_error(ValidationError::with_path(
                ErrorCode::EmptyEntryRequest,
                format!("entry request for chunk '{}' is empty", chunk),
                format!("entry.{}", chunk),
            ));
        }
    }

    if let Some(output) = &config.output {
        for message in filename_safety_errors(&output.filename) {
            result.add_error(ValidationError::with_path(
                ErrorCode::UnsafeOutputFilename,
                message,
                "output.filename",
            ));
        }
        if config.entry.chunks().len() > 1 && !output.filename.contains(NAME_PLACEHOLDER) {
            result.add_error(ValidationError::with_path(
                ErrorCode::UnsafeOutputFilename,
                format!(
                    "multiple chunks would overwrite '{}'; use {} in the filename",
                    output.filename, NAME_PLACEHOLDER
                ),
                "output.filename",
            ));
        }
    }

    for (index, rule) in config.module.rules.iter().enumerate() {
        if let Err(e) = Regex::new(&rule.test) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidRuleTest,
                format!("invalid rule pattern '{}': {}", rule.test, e),
                format!("module.rules[{}].test", index),
            ));
        }
        if let RuleUse::Chain(loaders) = &rule.use_ {
            if loaders.is_empty() {
                result.add_error(ValidationError::with_path(
                    ErrorCode::EmptyLoaderChain,
                    "loader chain must contain at least one loader",
                    format!("module.rules[{}].use", index),
                ));
            }
        }
    }

    for (index, plugin) in config.plugins.iter().enumerate() {
        match plugin {
            PluginSpec::ExtractCss { filename } => {
                for message in filename_safety_errors(filename) {
                    result.add_error(ValidationError::with_path(
                        ErrorCode::UnsafeExtractFilename,
                        message,
                        format!("plugins[{}].filename", index),
                    ));
                }
            }
            PluginSpec::OptimizeCssAssets {
                asset_name_regexp: Some(pattern),
                ..
            } => {
                if let Err(e) = Regex::new(pattern) {
                    result.add_error(ValidationError::with_path(
                        ErrorCode::InvalidAssetPattern,
                        format!("invalid asset name pattern '{}': {}", pattern, e),
                        format!("plugins[{}].asset_name_regexp", index),
                    ));
                }
            }
            PluginSpec::OptimizeCssAssets { .. } => {}
        }
    }

    result
}

/// Checks if a chunk name is usable in filenames.
pub fn is_valid_chunk_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && name != "."
        && name != ".."
}

/// Checks if an emitted filename stays inside the output directory.
pub fn is_safe_output_filename(filename: &str) -> bool {
    filename_safety_errors(filename).is_empty()
}

fn filename_safety_errors(filename: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if filename.is_empty() {
        errors.push("filename cannot be empty".to_string());
        return errors;
    }

    if filename.starts_with('/') || filename.starts_with('\\') {
        errors.push(format!(
            "filename must be relative, not absolute: '{}'",
            filename
        ));
    }

    if filename.len() >= 2 && filename.chars().nth(1) == Some(':') {
        errors.push(format!(
            "filename must not contain drive letter: '{}'",
            filename
        ));
    }

    if filename.contains('\\') {
        errors.push(format!(
            "filename must use forward slashes only: '{}'",
            filename
        ));
    }

    if filename.split('/').any(|segment| segment == "..") {
        errors.push(format!("filename must not contain '..': '{}'", filename));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EntrySpec, LoaderSpec, OutputSpec, RuleSpec};
    use crate::options::ProcessorOptions;
    use std::collections::BTreeMap;

    fn buildable() -> ConfigSpec {
        ConfigSpec::new(EntrySpec::named("test", "./index.js"))
            .with_context("/cases/basic")
            .with_output(OutputSpec::new("[name].js", "/out/basic"))
    }

    fn codes(result: &ValidationResult) -> Vec<ErrorCode> {
        result.errors.iter().map(|e| e.code).collect()
    }

    #[test]
    fn test_buildable_config_passes() {
        assert!(validate_for_build(&buildable()).is_ok());
    }

    #[test]
    fn test_missing_context_and_output() {
        let config = ConfigSpec::new(EntrySpec::Single("./index.js".to_string()));
        assert!(validate_config(&config).is_ok());

        let result = validate_for_build(&config);
        assert_eq!(
            codes(&result),
            vec![ErrorCode::InvalidContext, ErrorCode::MissingOutput]
        );
    }

    #[test]
    fn test_relative_paths_rejected() {
        let config = ConfigSpec::new(EntrySpec::Single("./index.js".to_string()))
            .with_context("cases/basic")
            .with_output(OutputSpec::new("[name].js", "out"));

        let result = validate_for_build(&config);
        assert_eq!(
            codes(&result),
            vec![ErrorCode::InvalidContext, ErrorCode::InvalidOutputPath]
        );
    }

    #[test]
    fn test_empty_entries() {
        let config = ConfigSpec::new(EntrySpec::Named(BTreeMap::new()));
        assert_eq!(codes(&validate_config(&config)), vec![ErrorCode::NoEntries]);

        let config = ConfigSpec::new(EntrySpec::named("bad name", "  "));
        assert_eq!(
            codes(&validate_config(&config)),
            vec![ErrorCode::InvalidChunkName, ErrorCode::EmptyEntryRequest]
        );
    }

    #[test]
    fn test_multi_chunk_needs_name_placeholder() {
        let mut entries = BTreeMap::new();
        entries.insert("a".to_string(), "./a.js".to_string());
        entries.insert("b".to_string(), "./b.js".to_string());
        let config = ConfigSpec::new(EntrySpec::Named(entries))
            .with_output(OutputSpec::new("bundle.js", "/out"));

        assert_eq!(
            codes(&validate_config(&config)),
            vec![ErrorCode::UnsafeOutputFilename]
        );
    }

    #[test]
    fn test_rule_validation() {
        let config = buildable()
            .with_rule(RuleSpec::chain("(unclosed", vec![LoaderSpec::Css]))
            .with_rule(RuleSpec::chain("\\.css$", Vec::new()));

        assert_eq!(
            codes(&validate_config(&config)),
            vec![ErrorCode::InvalidRuleTest, ErrorCode::EmptyLoaderChain]
        );
    }

    #[test]
    fn test_plugin_validation() {
        let config = buildable()
            .with_plugin(PluginSpec::ExtractCss {
                filename: "../escape.css".to_string(),
            })
            .with_plugin(PluginSpec::OptimizeCssAssets {
                asset_name_regexp: Some("[".to_string()),
                css_processor_options: ProcessorOptions::new(),
                can_print: None,
            });

        assert_eq!(
            codes(&validate_config(&config)),
            vec![
                ErrorCode::UnsafeExtractFilename,
                ErrorCode::InvalidAssetPattern
            ]
        );
    }

    #[test]
    fn test_filename_safety() {
        assert!(is_safe_output_filename("tmp.css"));
        assert!(is_safe_output_filename("css/[name].css"));
        assert!(!is_safe_output_filename(""));
        assert!(!is_safe_output_filename("/etc/passwd"));
        assert!(!is_safe_output_filename("C:/out.css"));
        assert!(!is_safe_output_filename("css\\out.css"));
        assert!(!is_safe_output_filename("css/../../out.css"));
    }

    #[test]
    fn test_chunk_names() {
        assert!(is_valid_chunk_name("test"));
        assert!(is_valid_chunk_name("vendor-1.min"));
        assert!(!is_valid_chunk_name(""));
        assert!(!is_valid_chunk_name(".."));
        assert!(!is_valid_chunk_name("a/b"));
    }
}
