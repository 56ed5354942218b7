//! Content-extraction transform.

use csspack_spec::{is_safe_output_filename, render_filename};

use crate::compilation::Compilation;
use crate::error::PluginError;
use crate::plugin::Plugin;

/// Plugin name used in diagnostics and asset origins.
pub const EXTRACT_PLUGIN_NAME: &str = "extract-css";

/// Writes every stylesheet routed to extraction into one file per chunk.
///
/// The destination filename may contain `[name]`, replaced by the chunk
/// name. Stylesheets are joined with a newline in module order; a chunk
/// without extracted stylesheets emits nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractCssPlugin {
    filename: String,
}

impl ExtractCssPlugin {
    /// Creates the plugin for a destination filename such as `tmp.css`.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }

    /// Destination filename template.
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

impl Plugin for ExtractCssPlugin {
    fn name(&self) -> &str {
        EXTRACT_PLUGIN_NAME
    }

    fn extracts_styles(&self) -> bool {
        true
    }

    fn additional_assets(&self, compilation: &mut Compilation) -> Result<(), PluginError> {
        if !is_safe_output_filename(&self.filename) {
            return Err(PluginError::new(
                EXTRACT_PLUGIN_NAME,
                format!("unsafe destination filename '{}'", self.filename),
            ));
        }

        let outputs: Vec<(String, String)> = compilation
            .chunks()
            .iter()
            .filter_map(|chunk| {
                let styles = chunk.extracted_styles();
                if styles.is_empty() {
                    return None;
                }
                let css = styles
                    .iter()
                    .map(|(_, css)| *css)
                    .collect::<Vec<_>>()
                    .join("\n");
                Some((render_filename(&self.filename, &chunk.name), css))
            })
            .collect();

        for (name, css) in outputs {
            compilation.emit_asset(name, css, EXTRACT_PLUGIN_NAME);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{Chunk, ModuleKind, ModuleRecord};

    fn chunk_with_styles(name: &str, styles: &[&str]) -> Chunk {
        let mut chunk = Chunk::new(name, format!("{}.js", name));
        for (i, css) in styles.iter().enumerate() {
            chunk.modules.push(ModuleRecord {
                id: format!("./{}.css", i),
                kind: ModuleKind::Extracted {
                    css: css.to_string(),
                },
            });
        }
        chunk
    }

    #[test]
    fn test_joins_styles_per_chunk() {
        let mut compilation = Compilation::new("/out");
        compilation.push_chunk(chunk_with_styles("app", &["a{}", "b{}"]));
        compilation.push_chunk(chunk_with_styles("admin", &["c{}"]));
        compilation.push_chunk(chunk_with_styles("empty", &[]));

        ExtractCssPlugin::new("[name].css")
            .additional_assets(&mut compilation)
            .unwrap();

        assert_eq!(
            compilation.asset("app.css").map(|a| a.source.as_str()),
            Some("a{}\nb{}")
        );
        assert_eq!(
            compilation.asset("admin.css").map(|a| a.source.as_str()),
            Some("c{}")
        );
        assert!(compilation.asset("empty.css").is_none());
    }

    #[test]
    fn test_fixed_filename_across_chunks_conflicts() {
        let mut compilation = Compilation::new("/out");
        compilation.push_chunk(chunk_with_styles("a", &["a{}"]));
        compilation.push_chunk(chunk_with_styles("b", &["b{}"]));

        ExtractCssPlugin::new("tmp.css")
            .additional_assets(&mut compilation)
            .unwrap();

        assert_eq!(
            compilation.asset("tmp.css").map(|a| a.source.as_str()),
            Some("a{}")
        );
        assert!(compilation.to_stats().has_errors());
    }

    #[test]
    fn test_unsafe_filename_rejected() {
        let mut compilation = Compilation::new("/out");
        let err = ExtractCssPlugin::new("../tmp.css")
            .additional_assets(&mut compilation)
            .unwrap_err();
        assert_eq!(err.plugin, EXTRACT_PLUGIN_NAME);
    }
}
