//! Turns declarative plugin descriptors into live plugins.

use std::sync::Arc;

use csspack_engine::{BuildConfig, ExtractCssPlugin, Plugin};
use csspack_spec::{ConfigSpec, PluginSpec};

use crate::error::ProcessorError;
use crate::plugin::OptimizeCssAssetsPlugin;

/// Creates the plugin a descriptor names.
pub fn plugin_from_spec(spec: &PluginSpec) -> Result<Arc<dyn Plugin>, ProcessorError> {
    match spec {
        PluginSpec::ExtractCss { filename } => Ok(Arc::new(ExtractCssPlugin::new(filename))),
        PluginSpec::OptimizeCssAssets {
            asset_name_regexp,
            css_processor_options,
            can_print,
        } => {
            let mut builder = OptimizeCssAssetsPlugin::builder()
                .css_processor_options(css_processor_options.clone());
            if let Some(pattern) = asset_name_regexp {
                builder = builder.asset_name_regexp(pattern.clone());
            }
            if let Some(can_print) = can_print {
                builder = builder.can_print(*can_print);
            }
            Ok(Arc::new(builder.build()?))
        }
    }
}

/// Builds a [`BuildConfig`] whose plugins are created from `spec.plugins`,
/// in declaration order.
pub fn instantiate(spec: ConfigSpec) -> Result<BuildConfig, ProcessorError> {
    let plugins = spec
        .plugins
        .iter()
        .map(plugin_from_spec)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(plugins
        .into_iter()
        .fold(BuildConfig::new(spec), BuildConfig::with_shared_plugin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use csspack_spec::{EntrySpec, ProcessorOptions};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_instantiates_in_declaration_order() {
        let spec = ConfigSpec::new(EntrySpec::named("test", "./index.js"))
            .with_plugin(PluginSpec::OptimizeCssAssets {
                asset_name_regexp: None,
                css_processor_options: ProcessorOptions::new(),
                can_print: Some(false),
            })
            .with_plugin(PluginSpec::ExtractCss {
                filename: "[name].css".to_string(),
            });

        let config = instantiate(spec).unwrap();
        let names: Vec<&str> = config.plugins.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["optimize-css-assets", "extract-css"]);
        assert!(config.plugins[1].extracts_styles());
    }

    #[test]
    fn test_invalid_pattern_fails() {
        let spec = ConfigSpec::new(EntrySpec::named("test", "./index.js")).with_plugin(
            PluginSpec::OptimizeCssAssets {
                asset_name_regexp: Some("[".to_string()),
                css_processor_options: ProcessorOptions::new(),
                can_print: None,
            },
        );
        assert!(matches!(
            instantiate(spec),
            Err(ProcessorError::InvalidAssetPattern { .. })
        ));
    }

    #[test]
    fn test_descriptor_names_match_plugin_names() {
        let extract = PluginSpec::ExtractCss {
            filename: "tmp.css".to_string(),
        };
        assert_eq!(plugin_from_spec(&extract).unwrap().name(), extract.name());
    }
}
