//! Build results: diagnostics and emitted asset summary.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Origin used for diagnostics raised by the compiler itself.
pub const COMPILATION_ORIGIN: &str = "compilation";

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The build produced broken or incomplete output.
    Error,
    /// The build succeeded but something deserves attention.
    Warning,
    /// Informational line, e.g. per-asset size reports.
    Log,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Log => write!(f, "LOG"),
        }
    }
}

/// A single diagnostic raised during a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity.
    pub severity: Severity,
    /// Who raised it: a plugin name, a module id, or `compilation`.
    pub origin: String,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic.
    pub fn new(severity: Severity, origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            origin: origin.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}\n{}", self.severity, self.origin, self.message)
    }
}

/// Summary of one emitted asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetInfo {
    /// Name relative to the output directory.
    pub name: String,
    /// Size in bytes.
    pub size: usize,
    /// Who produced it: `chunk:<name>` or a plugin name.
    pub origin: String,
}

/// Result of a completed build.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    /// BLAKE3 digest over every emitted asset name and content.
    pub hash: String,
    /// Directory assets were written to.
    pub output_path: PathBuf,
    /// Emitted assets, sorted by name.
    pub assets: Vec<AssetInfo>,
    /// All diagnostics in the order they were raised.
    pub diagnostics: Vec<Diagnostic>,
}

impl Stats {
    /// Returns true if any error diagnostic was raised.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns true if any warning diagnostic was raised.
    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning)
    }

    /// Error diagnostics.
    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.with_severity(Severity::Error)
    }

    /// Warning diagnostics.
    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.with_severity(Severity::Warning)
    }

    /// Log lines.
    pub fn logs(&self) -> Vec<&Diagnostic> {
        self.with_severity(Severity::Log)
    }

    /// Looks up an emitted asset by name.
    pub fn asset(&self, name: &str) -> Option<&AssetInfo> {
        self.assets.iter().find(|a| a.name == name)
    }

    fn with_severity(&self, severity: Severity) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .collect()
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short_hash: String = self.hash.chars().take(20).collect();
        writeln!(f, "Hash: {}", short_hash)?;
        writeln!(f, "Output: {}", self.output_path.display())?;

        let name_width = self
            .assets
            .iter()
            .map(|a| a.name.len())
            .max()
            .unwrap_or(0)
            .max("Asset".len());
        writeln!(f, "{:<name_width$}  {:>8}  Origin", "Asset", "Size")?;
        for asset in &self.assets {
            writeln!(
                f,
                "{:<name_width$}  {:>8}  {}",
                asset.name, asset.size, asset.origin
            )?;
        }

        for severity in [Severity::Error, Severity::Warning, Severity::Log] {
            for diagnostic in self.with_severity(severity) {
                writeln!(f)?;
                writeln!(f, "{}", diagnostic)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Stats {
        Stats {
            hash: "0123456789abcdef0123456789abcdef".to_string(),
            output_path: PathBuf::from("/out"),
            assets: vec![
                AssetInfo {
                    name: "test.js".to_string(),
                    size: 42,
                    origin: "chunk:test".to_string(),
                },
                AssetInfo {
                    name: "test.css".to_string(),
                    size: 7,
                    origin: "extract-css".to_string(),
                },
            ],
            diagnostics: vec![
                Diagnostic::new(Severity::Log, "optimize-css-assets", "processed test.css"),
                Diagnostic::new(Severity::Error, "./index.js", "Module not found: './missing.css'"),
                Diagnostic::new(Severity::Warning, "extract-css", "nothing to extract"),
            ],
        }
    }

    #[test]
    fn test_severity_queries() {
        let stats = sample();
        assert!(stats.has_errors());
        assert!(stats.has_warnings());
        assert_eq!(stats.errors().len(), 1);
        assert_eq!(stats.warnings().len(), 1);
        assert_eq!(stats.logs().len(), 1);
        assert_eq!(stats.asset("test.css").map(|a| a.size), Some(7));
        assert!(stats.asset("nope.css").is_none());
    }

    #[test]
    fn test_clean_stats_have_no_errors() {
        let stats = Stats::default();
        assert!(!stats.has_errors());
        assert!(!stats.has_warnings());
    }

    #[test]
    fn test_display_orders_errors_first() {
        let rendered = sample().to_string();
        assert!(rendered.starts_with("Hash: 0123456789abcdef0123\n"));
        assert!(rendered.contains("test.js"));

        let error_at = rendered.find("ERROR in ./index.js").unwrap();
        let warning_at = rendered.find("WARNING in extract-css").unwrap();
        let log_at = rendered.find("LOG in optimize-css-assets").unwrap();
        assert!(error_at < warning_at);
        assert!(warning_at < log_at);
    }
}
