//! Path-addressed snapshot store.
//!
//! Each snapshot is a raw text file at `<root>/<case>/<file>.snap`. Nothing
//! is written unless the store is in [`SnapshotMode::Update`]:
//!
//! ```bash
//! CSSPACK_UPDATE_SNAPSHOTS=1 cargo test -p csspack-tests --test case_integration
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable that switches snapshot checks to update mode.
pub const UPDATE_SNAPSHOTS_ENV: &str = "CSSPACK_UPDATE_SNAPSHOTS";

/// Extension appended to the snapshotted file name.
pub const SNAPSHOT_EXTENSION: &str = "snap";

/// Returns true if `name` is set to `1` or `true` (any case).
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Whether snapshots are checked or rewritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SnapshotMode {
    /// Compare against stored snapshots; a missing one is a failure.
    #[default]
    Verify,
    /// Store the actual content.
    Update,
}

impl SnapshotMode {
    /// Reads the mode from [`UPDATE_SNAPSHOTS_ENV`].
    pub fn from_env() -> Self {
        if env_flag(UPDATE_SNAPSHOTS_ENV) {
            SnapshotMode::Update
        } else {
            SnapshotMode::Verify
        }
    }
}

/// Result of checking one file against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// The stored snapshot equals the actual content.
    Matched,
    /// Update mode stored new content.
    Written { path: PathBuf },
    /// Verify mode found no snapshot.
    Missing { path: PathBuf },
    /// Verify mode found a different snapshot.
    Mismatch { path: PathBuf, snapshot: String },
}

impl SnapshotOutcome {
    /// Returns true for outcomes that fail a comparison.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            SnapshotOutcome::Missing { .. } | SnapshotOutcome::Mismatch { .. }
        )
    }
}

/// Snapshot store I/O failures.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// A snapshot could not be written.
    #[error("failed to write snapshot {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Snapshot store rooted at a directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
    mode: SnapshotMode,
}

impl SnapshotStore {
    /// Creates a store.
    pub fn new(root: impl Into<PathBuf>, mode: SnapshotMode) -> Self {
        Self {
            root: root.into(),
            mode,
        }
    }

    /// Store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current mode.
    pub fn mode(&self) -> SnapshotMode {
        self.mode
    }

    /// Path of the snapshot for `file` of `case`.
    pub fn path_for(&self, case: &str, file: &str) -> PathBuf {
        self.root
            .join(case)
            .join(format!("{}.{}", file, SNAPSHOT_EXTENSION))
    }

    /// Reads a stored snapshot.
    pub fn read(&self, case: &str, file: &str) -> Option<String> {
        fs::read_to_string(self.path_for(case, file)).ok()
    }

    /// Checks `actual` against the stored snapshot, or stores it in update
    /// mode.
    pub fn check(
        &self,
        case: &str,
        file: &str,
        actual: &str,
    ) -> Result<SnapshotOutcome, SnapshotError> {
        let path = self.path_for(case, file);
        let stored = fs::read_to_string(&path).ok();

        match (self.mode, stored) {
            (_, Some(snapshot)) if snapshot == actual => Ok(SnapshotOutcome::Matched),
            (SnapshotMode::Update, _) => {
                write_snapshot(&path, actual)?;
                eprintln!("NOTE: snapshot written: {}", path.display());
                Ok(SnapshotOutcome::Written { path })
            }
            (SnapshotMode::Verify, Some(snapshot)) => {
                Ok(SnapshotOutcome::Mismatch { path, snapshot })
            }
            (SnapshotMode::Verify, None) => Ok(SnapshotOutcome::Missing { path }),
        }
    }
}

fn write_snapshot(path: &Path, content: &str) -> Result<(), SnapshotError> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    };
    write().map_err(|source| SnapshotError::Write {
        path: path.to_path_buf(),
        source,
    })
}
