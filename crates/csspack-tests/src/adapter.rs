//! Processor stubs and the fixed build used to exercise the processing hook
//! directly.
//!
//! The fixed build resolves `./default/index` from the fixture root, extracts
//! every stylesheet into `tmp.css` and optimizes it with the processor under
//! test.

use std::path::Path;
use std::sync::{Arc, Mutex};

use csspack_engine::{BuildConfig, ExtractCssPlugin, Stats};
use csspack_optimize::{
    CssProcessor, OptimizeCssAssetsPlugin, ProcessedCss, ProcessorError, ProcessorInvocation,
    ProcessorResult,
};
use csspack_spec::{ConfigSpec, EntrySpec, LoaderSpec, OutputSpec, ProcessorOptions, RuleSpec};
use serde_json::json;

use crate::cases::run_to_completion;
use crate::error::CaseError;
use crate::fixtures::fixtures_root;

/// Case name used when reporting a failed adapter build.
pub const ADAPTER_CASE: &str = "default";
/// Entry request of the fixed build.
pub const ADAPTER_ENTRY: &str = "./default/index";
/// Chunk script emitted by the fixed build.
pub const ADAPTER_SCRIPT_FILENAME: &str = "tmp.js";
/// Stylesheet emitted by the fixed build.
pub const ADAPTER_STYLESHEET_FILENAME: &str = "tmp.css";
/// Output of [`FixedOutputProcessor::stub`].
pub const STUB_CSS: &str = ".inifinity-pool{overflow:hidden;}";

/// Options configured on the plugin in the fixed build.
pub fn adapter_options() -> ProcessorOptions {
    ProcessorOptions::new().with("discardComments", json!({"removeAll": true}))
}

/// Pass-through processor that records every call.
#[derive(Debug, Default)]
pub struct RecordingProcessor {
    calls: Mutex<Vec<ProcessorInvocation>>,
}

impl RecordingProcessor {
    /// Creates a processor with an empty call log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<ProcessorInvocation> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl CssProcessor for RecordingProcessor {
    fn name(&self) -> &str {
        "recording"
    }

    fn process(&self, css: &str, options: &ProcessorOptions) -> ProcessorResult<ProcessedCss> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(ProcessorInvocation {
                css: css.to_string(),
                options: options.clone(),
            });
        Ok(ProcessedCss::new(css))
    }
}

/// Processor that ignores its input and returns fixed text.
#[derive(Debug)]
pub struct FixedOutputProcessor {
    output: String,
    calls: Mutex<usize>,
}

impl FixedOutputProcessor {
    /// Creates a processor returning `output`.
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            calls: Mutex::new(0),
        }
    }

    /// Processor returning [`STUB_CSS`].
    pub fn stub() -> Self {
        Self::new(STUB_CSS)
    }

    /// Fixed output text.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Number of calls received.
    pub fn call_count(&self) -> usize {
        *self
            .calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CssProcessor for FixedOutputProcessor {
    fn name(&self) -> &str {
        "fixed-output"
    }

    fn process(&self, _css: &str, _options: &ProcessorOptions) -> ProcessorResult<ProcessedCss> {
        *self
            .calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) += 1;
        Ok(ProcessedCss::new(self.output.clone()))
    }
}

/// Configuration data of the fixed build writing into `output_dir`.
pub fn default_spec(output_dir: &Path) -> ConfigSpec {
    ConfigSpec::new(EntrySpec::Single(ADAPTER_ENTRY.to_string()))
        .with_context(fixtures_root())
        .with_output(OutputSpec::new(ADAPTER_SCRIPT_FILENAME, output_dir))
        .with_rule(RuleSpec::extract(
            r"\.css$",
            LoaderSpec::Style,
            LoaderSpec::Css,
        ))
}

/// The fixed build with `processor` plugged into the optimize plugin.
pub fn default_config(
    processor: Arc<dyn CssProcessor>,
    options: ProcessorOptions,
    output_dir: &Path,
) -> Result<BuildConfig, ProcessorError> {
    let optimize = OptimizeCssAssetsPlugin::builder()
        .shared_css_processor(processor)
        .css_processor_options(options)
        .build()?;

    Ok(BuildConfig::new(default_spec(output_dir))
        .with_plugin(optimize)
        .with_plugin(ExtractCssPlugin::new(ADAPTER_STYLESHEET_FILENAME)))
}

/// Runs a build, turning a failed build into a [`CaseError`] carrying the
/// diagnostics.
pub fn run_adapter_build(config: BuildConfig) -> Result<Stats, CaseError> {
    match run_to_completion(config) {
        Ok(stats) if stats.has_errors() => Err(CaseError::BuildDiagnostics {
            case: ADAPTER_CASE.to_string(),
            stats,
        }),
        Ok(stats) => Ok(stats),
        Err(source) => Err(CaseError::BuildInvocation {
            case: ADAPTER_CASE.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_recording_processor_is_pass_through() {
        let processor = RecordingProcessor::new();
        let out = processor.process("a{}", &adapter_options()).unwrap();
        assert_eq!(out.css, "a{}");
        assert_eq!(processor.calls().len(), 1);
        assert_eq!(processor.calls()[0].options, adapter_options());
    }

    #[test]
    fn test_fixed_output_processor_counts_calls() {
        let processor = FixedOutputProcessor::stub();
        assert_eq!(processor.call_count(), 0);
        let out = processor.process("a{}", &ProcessorOptions::new()).unwrap();
        assert_eq!(out.css, STUB_CSS);
        assert_eq!(processor.call_count(), 1);
    }

    #[test]
    fn test_plugin_order_in_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = default_config(
            Arc::new(RecordingProcessor::new()),
            adapter_options(),
            dir.path(),
        )
        .unwrap();
        let names: Vec<&str> = config.plugins.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["optimize-css-assets", "extract-css"]);
    }
}
