//! Processing hook contract tests.
//!
//! Both scenarios build `fixtures/default` with the optimize plugin and the
//! extraction plugin writing `tmp.css`, each into its own temp directory.

use std::fs;
use std::sync::Arc;

use csspack_spec::ProcessorOptions;
use csspack_tests::adapter::{
    adapter_options, default_config, run_adapter_build, FixedOutputProcessor, RecordingProcessor,
    ADAPTER_STYLESHEET_FILENAME, STUB_CSS,
};
use csspack_tests::fixtures::default_fixture_dir;
use csspack_tests::read_file_or_empty;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn processor_receives_stylesheet_and_forced_paths() {
    let out = TempDir::new().unwrap();
    let processor = Arc::new(RecordingProcessor::new());
    let config = default_config(processor.clone(), adapter_options(), out.path()).unwrap();

    run_adapter_build(config).unwrap_or_else(|e| panic!("build failed:\n{}", e));

    let calls = processor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].css,
        read_file_or_empty(&default_fixture_dir().join("default.css"))
    );
    assert_eq!(
        calls[0].options.clone().into_value(),
        json!({
            "discardComments": {"removeAll": true},
            "from": "tmp.css",
            "to": "tmp.css",
        })
    );
}

#[test]
fn forced_paths_replace_configured_paths() {
    let out = TempDir::new().unwrap();
    let processor = Arc::new(RecordingProcessor::new());
    let options = adapter_options()
        .with("from", json!("src/app.css"))
        .with("to", json!("dist/app.min.css"));
    let config = default_config(processor.clone(), options, out.path()).unwrap();

    run_adapter_build(config).unwrap_or_else(|e| panic!("build failed:\n{}", e));

    let options = &processor.calls()[0].options;
    assert_eq!(options.get("from"), Some(&json!("tmp.css")));
    assert_eq!(options.get("to"), Some(&json!("tmp.css")));
    assert_eq!(
        options.get("discardComments"),
        Some(&json!({"removeAll": true}))
    );
}

#[test]
fn processor_output_is_written_verbatim() {
    let out = TempDir::new().unwrap();
    let processor = Arc::new(FixedOutputProcessor::stub());
    let config = default_config(processor.clone(), adapter_options(), out.path()).unwrap();

    run_adapter_build(config).unwrap_or_else(|e| panic!("build failed:\n{}", e));

    assert!(processor.call_count() >= 1);
    let written = fs::read(out.path().join(ADAPTER_STYLESHEET_FILENAME)).unwrap();
    assert_eq!(written, STUB_CSS.as_bytes());
}

#[test]
fn default_processor_strips_comments_in_build() {
    let out = TempDir::new().unwrap();
    let config = default_config(
        Arc::new(csspack_optimize::CommentStripper),
        adapter_options(),
        out.path(),
    )
    .unwrap();

    let stats = run_adapter_build(config).unwrap_or_else(|e| panic!("build failed:\n{}", e));

    let written = read_file_or_empty(&out.path().join(ADAPTER_STYLESHEET_FILENAME));
    assert!(!written.contains("/*"));
    assert!(written.contains(".inifinity-pool"));
    assert_eq!(stats.logs().len(), 1);
    assert!(stats.logs()[0].message.starts_with("tmp.css: "));
}

#[test]
fn chunk_script_is_not_processed() {
    let out = TempDir::new().unwrap();
    let processor = Arc::new(RecordingProcessor::new());
    let config = default_config(processor.clone(), ProcessorOptions::new(), out.path()).unwrap();

    let stats = run_adapter_build(config).unwrap_or_else(|e| panic!("build failed:\n{}", e));

    assert!(stats.asset("tmp.js").is_some());
    assert!(processor
        .calls()
        .iter()
        .all(|call| call.options.get("to") == Some(&json!("tmp.css"))));
}
