//! Fixture paths and lenient file loading.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Directory under the fixture root holding one subdirectory per case.
pub const CASES_DIR: &str = "cases";
/// Directory under the fixture root holding the snapshot store.
pub const SNAPSHOTS_DIR: &str = "snapshots";
/// Directory under the fixture root holding the adapter scenario sources.
pub const DEFAULT_DIR: &str = "default";
/// Directory inside a case holding its golden files.
pub const EXPECTED_DIR: &str = "expected";
/// Optional per-case configuration file.
pub const CASE_CONFIG_FILE: &str = "csspack.config.json";
/// Entry file of a case without its own configuration.
pub const CASE_ENTRY_FILE: &str = "index.js";
/// Directory under the output root holding per-case build output.
pub const OUTPUT_JS_DIR: &str = "js";

/// Root of the fixtures shipped with this crate.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Root of the shipped cases.
pub fn cases_root() -> PathBuf {
    fixtures_root().join(CASES_DIR)
}

/// Root of the shipped snapshot store.
pub fn snapshots_root() -> PathBuf {
    fixtures_root().join(SNAPSHOTS_DIR)
}

/// Directory of the adapter scenario sources.
pub fn default_fixture_dir() -> PathBuf {
    fixtures_root().join(DEFAULT_DIR)
}

/// Reads a text file, returning `""` on any failure.
///
/// A missing expected file is an empty expectation, not an error.
pub fn read_file_or_empty(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

/// Lists regular files under `dir` as sorted `/`-separated relative names.
///
/// A missing directory lists nothing.
pub fn list_files(dir: &Path) -> Vec<String> {
    if !dir.is_dir() {
        return Vec::new();
    }
    let mut files: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            e.path().strip_prefix(dir).ok().map(|relative| {
                relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
        })
        .collect();
    files.sort();
    files
}
