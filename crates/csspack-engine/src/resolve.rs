//! Request discovery and resolution.
//!
//! Only relative requests are supported. There is no package lookup: a bare
//! specifier such as `require('lodash')` does not resolve.

use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

/// Extension tried for extension-less requests.
pub const SCRIPT_EXTENSION: &str = "js";

/// File tried when a request names a directory.
pub const DIRECTORY_INDEX: &str = "index.js";

fn request_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"(?m)require\s*\(\s*['"]([^'"]+)['"]\s*\)|^\s*import\s+(?:[^'";]*?\s+from\s+)?['"]([^'"]+)['"]"#,
        )
        .expect("request pattern is valid")
    })
}

/// Finds `require('...')` and `import ... '...'` requests in script source,
/// in source order.
pub fn discover_requests(source: &str) -> Vec<String> {
    request_pattern()
        .captures_iter(source)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Returns true for `./x`, `../x` and absolute requests.
pub fn is_relative_request(request: &str) -> bool {
    request.starts_with("./") || request.starts_with("../") || request.starts_with('/')
}

/// Resolves `request` against `base_dir`.
///
/// Tries the exact path, then the path with a `.js` extension (only for
/// extension-less requests), then `index.js` inside a directory.
pub fn resolve_request(base_dir: &Path, request: &str) -> Option<PathBuf> {
    if !is_relative_request(request) {
        return None;
    }

    let candidate = normalize_path(&base_dir.join(request));
    if candidate.is_file() {
        return Some(candidate);
    }

    if candidate.extension().is_none() {
        let with_extension = candidate.with_extension(SCRIPT_EXTENSION);
        if with_extension.is_file() {
            return Some(with_extension);
        }
    }

    let index = candidate.join(DIRECTORY_INDEX);
    if index.is_file() {
        return Some(index);
    }

    None
}

/// Removes `.` components and folds `..` components lexically.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Stable module id: the path relative to `context`, `./`-prefixed, with
/// forward slashes. Paths outside the context keep their full form.
pub fn module_id(context: &Path, path: &Path) -> String {
    match path.strip_prefix(context) {
        Ok(relative) => {
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            format!("./{}", parts.join("/"))
        }
        Err(_) => path.to_string_lossy().replace('\\', "/"),
    }
}

/// Returns true if the module is a script that is walked for requests.
pub fn is_script(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(SCRIPT_EXTENSION)
}
