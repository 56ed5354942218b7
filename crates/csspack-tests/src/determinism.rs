//! BLAKE3 digests of build output trees.
//!
//! Two runs of the same case must leave byte-identical output directories:
//!
//! ```rust,ignore
//! let first = digest_dir(&suite.case_output_dir("basic"));
//! suite.run_case("basic")?;
//! assert_eq!(first, digest_dir(&suite.case_output_dir("basic")));
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::fixtures::list_files;

/// Per-file BLAKE3 hex digests, keyed by `/`-separated relative name.
pub fn file_digests(dir: &Path) -> BTreeMap<String, String> {
    list_files(dir)
        .into_iter()
        .map(|name| {
            let bytes = fs::read(dir.join(&name)).unwrap_or_default();
            let hash = blake3::hash(&bytes).to_hex().to_string();
            (name, hash)
        })
        .collect()
}

/// Digest over every file name and content under `dir`.
pub fn digest_dir(dir: &Path) -> String {
    let mut hasher = blake3::Hasher::new();
    for (name, hash) in file_digests(dir) {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
        hasher.update(hash.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize().to_hex().to_string()
}

/// Names whose digests differ between two digest maps, including names
/// present on only one side.
pub fn changed_files(
    before: &BTreeMap<String, String>,
    after: &BTreeMap<String, String>,
) -> Vec<String> {
    let mut names: Vec<String> = before
        .keys()
        .chain(after.keys())
        .filter(|name| before.get(*name) != after.get(*name))
        .cloned()
        .collect();
    names.sort();
    names.dedup();
    names
}
