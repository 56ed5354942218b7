//! The optimize-css-assets plugin.

use std::fmt;
use std::sync::{Arc, OnceLock};

use csspack_engine::{Compilation, Plugin, PluginError};
use csspack_spec::ProcessorOptions;
use regex::Regex;

use crate::error::ProcessorError;
use crate::processor::{CommentStripper, CssProcessor};

/// Plugin name used in diagnostics.
pub const OPTIMIZE_PLUGIN_NAME: &str = "optimize-css-assets";

/// Assets processed when no pattern is configured.
pub const DEFAULT_ASSET_NAME_REGEXP: &str = r"\.css$";

fn default_asset_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(DEFAULT_ASSET_NAME_REGEXP).expect("default pattern is valid"))
}

/// Runs a [`CssProcessor`] over every stylesheet asset at the
/// `optimize_assets` stage.
///
/// Each asset whose name matches the pattern is replaced by exactly what the
/// processor returns. The processor sees `from`/`to` set to the asset name.
/// A failing asset is reported as an error diagnostic and left as it was;
/// the remaining assets are still processed.
#[derive(Clone)]
pub struct OptimizeCssAssetsPlugin {
    asset_name_regexp: Regex,
    processor: Arc<dyn CssProcessor>,
    options: ProcessorOptions,
    can_print: bool,
}

impl OptimizeCssAssetsPlugin {
    /// Creates the plugin with default settings.
    pub fn new() -> Self {
        Self {
            asset_name_regexp: default_asset_pattern().clone(),
            processor: Arc::new(CommentStripper),
            options: ProcessorOptions::new(),
            can_print: true,
        }
    }

    /// Starts a builder.
    pub fn builder() -> OptimizeCssAssetsBuilder {
        OptimizeCssAssetsBuilder::default()
    }

    /// Pattern selecting processed assets.
    pub fn asset_name_regexp(&self) -> &Regex {
        &self.asset_name_regexp
    }

    /// Options as configured, before `from`/`to` are forced.
    pub fn css_processor_options(&self) -> &ProcessorOptions {
        &self.options
    }

    /// Whether size lines are logged.
    pub fn can_print(&self) -> bool {
        self.can_print
    }
}

impl Default for OptimizeCssAssetsPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OptimizeCssAssetsPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptimizeCssAssetsPlugin")
            .field("asset_name_regexp", &self.asset_name_regexp.as_str())
            .field("processor", &self.processor.name())
            .field("options", &self.options)
            .field("can_print", &self.can_print)
            .finish()
    }
}

impl Plugin for OptimizeCssAssetsPlugin {
    fn name(&self) -> &str {
        OPTIMIZE_PLUGIN_NAME
    }

    fn optimize_assets(&self, compilation: &mut Compilation) -> Result<(), PluginError> {
        let names: Vec<String> = compilation
            .asset_names()
            .into_iter()
            .filter(|name| self.asset_name_regexp.is_match(name))
            .collect();

        for name in names {
            let Some(source) = compilation.asset(&name).map(|a| a.source.clone()) else {
                continue;
            };
            let options = self.options.with_forced_paths(&name);

            match self.processor.process(&source, &options) {
                Ok(processed) => {
                    let after = processed.css.len();
                    compilation.update_asset(&name, processed.css);
                    if self.can_print {
                        compilation.log(
                            OPTIMIZE_PLUGIN_NAME,
                            format!(
                                "{}: {} -> {} bytes ({})",
                                name,
                                source.len(),
                                after,
                                self.processor.name()
                            ),
                        );
                    }
                }
                Err(e) => compilation.error(
                    OPTIMIZE_PLUGIN_NAME,
                    format!("failed to process asset '{}': {}", name, e),
                ),
            }
        }
        Ok(())
    }
}

/// Builder for [`OptimizeCssAssetsPlugin`].
#[derive(Default)]
pub struct OptimizeCssAssetsBuilder {
    asset_name_regexp: Option<String>,
    processor: Option<Arc<dyn CssProcessor>>,
    options: ProcessorOptions,
    can_print: Option<bool>,
}

impl OptimizeCssAssetsBuilder {
    /// Sets the asset name pattern.
    pub fn asset_name_regexp(mut self, pattern: impl Into<String>) -> Self {
        self.asset_name_regexp = Some(pattern.into());
        self
    }

    /// Sets the processor.
    pub fn css_processor(self, processor: impl CssProcessor + 'static) -> Self {
        self.shared_css_processor(Arc::new(processor))
    }

    /// Sets a processor the caller keeps a handle to.
    pub fn shared_css_processor(mut self, processor: Arc<dyn CssProcessor>) -> Self {
        self.processor = Some(processor);
        self
    }

    /// Sets the options forwarded to the processor.
    pub fn css_processor_options(mut self, options: ProcessorOptions) -> Self {
        self.options = options;
        self
    }

    /// Turns size logging on or off.
    pub fn can_print(mut self, can_print: bool) -> Self {
        self.can_print = Some(can_print);
        self
    }

    /// Builds the plugin, compiling the asset name pattern.
    pub fn build(self) -> Result<OptimizeCssAssetsPlugin, ProcessorError> {
        let asset_name_regexp = match self.asset_name_regexp {
            Some(pattern) => {
                Regex::new(&pattern).map_err(|e| ProcessorError::InvalidAssetPattern {
                    message: e.to_string(),
                    pattern,
                })?
            }
            None => default_asset_pattern().clone(),
        };

        Ok(OptimizeCssAssetsPlugin {
            asset_name_regexp,
            processor: self
                .processor
                .unwrap_or_else(|| Arc::new(CommentStripper)),
            options: self.options,
            can_print: self.can_print.unwrap_or(true),
        })
    }
}
