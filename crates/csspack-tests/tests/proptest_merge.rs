//! Property tests for the harness-controlled fields.
//!
//! - Case configs never win over the forced `context` and `output`.
//! - The processor always sees `from`/`to` equal to the asset name.

use std::sync::Arc;

use csspack_engine::{Compilation, Plugin};
use csspack_optimize::OptimizeCssAssetsPlugin;
use csspack_spec::{
    merge_case_config, ConfigSpec, EntrySpec, ForcedFields, OutputSpec, ProcessorOptions,
};
use csspack_tests::adapter::RecordingProcessor;
use proptest::prelude::*;
use serde_json::json;

fn path_strategy() -> impl Strategy<Value = String> {
    "/[a-z]{1,8}(/[a-z0-9_-]{1,8}){0,3}"
}

proptest! {
    #[test]
    fn case_config_never_overrides_forced_fields(
        case_context in path_strategy(),
        case_out in path_strategy(),
        case_filename in "[a-z]{1,8}\\.js",
        chunk in "[a-z]{1,8}",
    ) {
        let base = ConfigSpec::new(EntrySpec::named(chunk.clone(), "./index.js"))
            .with_context(case_context)
            .with_output(OutputSpec::new(case_filename, case_out));
        let forced = ForcedFields::for_case("/cases/prop", "/out/js/prop");

        let merged = merge_case_config(Some(base.clone()), &forced);

        prop_assert_eq!(merged.context, Some(forced.context.clone()));
        prop_assert_eq!(merged.output, Some(forced.output.clone()));
        prop_assert_eq!(merged.entry, base.entry);
    }

    #[test]
    fn processor_sees_asset_name_as_from_and_to(
        stem in "[a-z]{1,10}",
        user_from in "[a-z]{1,10}\\.css",
        user_to in "[a-z]{1,10}\\.css",
        flag in any::<bool>(),
    ) {
        let recorder = Arc::new(RecordingProcessor::new());
        let plugin = OptimizeCssAssetsPlugin::builder()
            .shared_css_processor(recorder.clone())
            .css_processor_options(
                ProcessorOptions::new()
                    .with("from", json!(user_from))
                    .with("to", json!(user_to))
                    .with("safe", json!(flag)),
            )
            .can_print(false)
            .build()
            .unwrap();

        let name = format!("{}.css", stem);
        let mut compilation = Compilation::new("/out");
        compilation.emit_asset(name.clone(), "a{}", "extract-css");
        plugin.optimize_assets(&mut compilation).unwrap();

        let calls = recorder.calls();
        prop_assert_eq!(calls.len(), 1);
        prop_assert_eq!(calls[0].options.get("from"), Some(&json!(name)));
        prop_assert_eq!(calls[0].options.get("to"), Some(&json!(name)));
        prop_assert_eq!(calls[0].options.get("safe"), Some(&json!(flag)));
    }
}
