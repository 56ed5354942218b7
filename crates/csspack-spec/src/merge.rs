//! Typed overlay of harness-controlled fields onto a case configuration.
//!
//! Field precedence in [`merge_case_config`]:
//!
//! | field     | winner                          |
//! |-----------|---------------------------------|
//! | `entry`   | base (case config or default)   |
//! | `context` | forced                          |
//! | `output`  | forced                          |
//! | `module`  | base                            |
//! | `plugins` | base                            |
//!
//! The merge is shallow: a forced `output` replaces the base `output` as a
//! whole, it is never merged key by key.

use std::path::PathBuf;

use crate::config::{ConfigSpec, EntrySpec, OutputSpec};

/// Chunk name of the default case entry.
pub const DEFAULT_CASE_CHUNK: &str = "test";

/// Request of the default case entry.
pub const DEFAULT_CASE_REQUEST: &str = "./index.js";

/// Filename template forced onto every case build.
pub const CASE_OUTPUT_FILENAME: &str = "[name].js";

/// Fields the harness always controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcedFields {
    /// Directory requests are resolved against.
    pub context: PathBuf,
    /// Where the build writes its assets.
    pub output: OutputSpec,
}

impl ForcedFields {
    /// Forced fields for a case: context is the case directory and output is
    /// `[name].js` inside `output_dir`.
    pub fn for_case(case_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            context: case_dir.into(),
            output: OutputSpec::new(CASE_OUTPUT_FILENAME, output_dir),
        }
    }
}

/// The base used when a case ships no configuration of its own.
pub fn default_case_config() -> ConfigSpec {
    ConfigSpec::new(EntrySpec::named(DEFAULT_CASE_CHUNK, DEFAULT_CASE_REQUEST))
}

/// Overlays `forced` onto `base` (or the default base when `None`).
pub fn merge_case_config(base: Option<ConfigSpec>, forced: &ForcedFields) -> ConfigSpec {
    let base = base.unwrap_or_else(default_case_config);
    ConfigSpec {
        entry: base.entry,
        context: Some(forced.context.clone()),
        output: Some(forced.output.clone()),
        module: base.module,
        plugins: base.plugins,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoaderSpec, PluginSpec, RuleSpec};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn forced() -> ForcedFields {
        ForcedFields::for_case("/cases/basic", "/out/js/basic")
    }

    #[test]
    fn test_default_base_when_no_case_config() {
        let merged = merge_case_config(None, &forced());

        assert_eq!(merged.entry, EntrySpec::named("test", "./index.js"));
        assert_eq!(merged.context, Some(PathBuf::from("/cases/basic")));
        assert_eq!(
            merged.output,
            Some(OutputSpec::new("[name].js", "/out/js/basic"))
        );
        assert!(merged.module.rules.is_empty());
        assert!(merged.plugins.is_empty());
    }

    #[test]
    fn test_case_config_keeps_entry_rules_and_plugins() {
        let base = ConfigSpec::new(EntrySpec::Single("./main.js".to_string()))
            .with_rule(RuleSpec::extract("\\.css$", LoaderSpec::Style, LoaderSpec::Css))
            .with_plugin(PluginSpec::ExtractCss {
                filename: "file.css".to_string(),
            });

        let merged = merge_case_config(Some(base.clone()), &forced());
        assert_eq!(merged.entry, base.entry);
        assert_eq!(merged.module, base.module);
        assert_eq!(merged.plugins, base.plugins);
    }

    #[test]
    fn test_forced_fields_replace_case_values() {
        let base = ConfigSpec::new(EntrySpec::Single("./main.js".to_string()))
            .with_context("/somewhere/else")
            .with_output(OutputSpec::new("bundle.js", "/tmp/elsewhere"));

        let merged = merge_case_config(Some(base), &forced());
        assert_eq!(merged.context, Some(PathBuf::from("/cases/basic")));
        assert_eq!(
            merged.output,
            Some(OutputSpec::new("[name].js", "/out/js/basic"))
        );
    }

    proptest! {
        #[test]
        fn prop_forced_fields_always_win(
            case_context in "/[a-z]{1,10}(/[a-z]{1,10}){0,3}",
            case_filename in "[a-z\\[\\]]{1,12}\\.js",
            case_out in "/[a-z]{1,10}(/[a-z]{1,10}){0,3}",
            has_context in any::<bool>(),
            has_output in any::<bool>(),
        ) {
            let mut base = ConfigSpec::new(EntrySpec::Single("./index.js".to_string()));
            if has_context {
                base = base.with_context(case_context);
            }
            if has_output {
                base = base.with_output(OutputSpec::new(case_filename, case_out));
            }

            let forced = forced();
            let merged = merge_case_config(Some(base), &forced);
            prop_assert_eq!(merged.context, Some(forced.context.clone()));
            prop_assert_eq!(merged.output, Some(forced.output.clone()));
        }
    }
}
