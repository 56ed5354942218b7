//! Mutable build state shared with plugin hooks.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::chunk::Chunk;
use crate::stats::{AssetInfo, Diagnostic, Severity, Stats};

/// An in-memory text asset waiting to be emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Asset text.
    pub source: String,
    /// Who produced it: `chunk:<name>` or a plugin name.
    pub origin: String,
}

/// State of one build, handed to plugins between the module and emit phases.
#[derive(Debug)]
pub struct Compilation {
    output_path: PathBuf,
    chunks: Vec<Chunk>,
    assets: BTreeMap<String, Asset>,
    diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    /// Creates an empty compilation writing to `output_path`.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            chunks: Vec::new(),
            assets: BTreeMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Output directory of this build.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Chunks in entry order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub(crate) fn push_chunk(&mut self, chunk: Chunk) {
        self.chunks.push(chunk);
    }

    /// Adds a new asset.
    ///
    /// Two producers claiming the same name is a build error; the first asset
    /// is kept. Returns whether the asset was added.
    pub fn emit_asset(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
        origin: impl Into<String>,
    ) -> bool {
        let name = name.into();
        let origin = origin.into();
        if let Some(existing) = self.assets.get(&name) {
            let message = format!(
                "Conflict: multiple assets emit to the same filename '{}' ({} and {})",
                name, existing.origin, origin
            );
            self.error(origin, message);
            return false;
        }
        self.assets.insert(
            name,
            Asset {
                source: source.into(),
                origin,
            },
        );
        true
    }

    /// Replaces the text of an existing asset. Returns false if absent.
    pub fn update_asset(&mut self, name: &str, source: impl Into<String>) -> bool {
        match self.assets.get_mut(name) {
            Some(asset) => {
                asset.source = source.into();
                true
            }
            None => false,
        }
    }

    /// Looks up an asset.
    pub fn asset(&self, name: &str) -> Option<&Asset> {
        self.assets.get(name)
    }

    /// Asset names in sorted order.
    pub fn asset_names(&self) -> Vec<String> {
        self.assets.keys().cloned().collect()
    }

    /// All assets, sorted by name.
    pub fn assets(&self) -> &BTreeMap<String, Asset> {
        &self.assets
    }

    /// Records an error diagnostic.
    pub fn error(&mut self, origin: impl Into<String>, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::new(Severity::Error, origin, message));
    }

    /// Records a warning diagnostic.
    pub fn warning(&mut self, origin: impl Into<String>, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::new(Severity::Warning, origin, message));
    }

    /// Records a log line.
    pub fn log(&mut self, origin: impl Into<String>, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::new(Severity::Log, origin, message));
    }

    /// Diagnostics raised so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Summarizes the compilation.
    pub fn to_stats(&self) -> Stats {
        let mut hasher = blake3::Hasher::new();
        for (name, asset) in &self.assets {
            hasher.update(name.as_bytes());
            hasher.update(&[0]);
            hasher.update(asset.source.as_bytes());
            hasher.update(&[0]);
        }

        Stats {
            hash: hasher.finalize().to_hex().to_string(),
            output_path: self.output_path.clone(),
            assets: self
                .assets
                .iter()
                .map(|(name, asset)| AssetInfo {
                    name: name.clone(),
                    size: asset.source.len(),
                    origin: asset.origin.clone(),
                })
                .collect(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}
