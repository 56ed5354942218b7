//! Plugin hooks.

use crate::compilation::Compilation;
use crate::error::PluginError;

/// A build plugin.
///
/// Hooks run in two fixed stages after all chunks are built: every plugin's
/// [`Plugin::additional_assets`], then every plugin's
/// [`Plugin::optimize_assets`]. Within a stage plugins run in registration
/// order. A hook error becomes an error diagnostic; the build continues.
pub trait Plugin: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Whether this plugin takes stylesheets routed to extraction.
    ///
    /// When no registered plugin does, every module routed to extraction is
    /// an error and is rendered with its rule's fallback loader.
    fn extracts_styles(&self) -> bool {
        false
    }

    /// Adds assets derived from the built chunks.
    fn additional_assets(&self, _compilation: &mut Compilation) -> Result<(), PluginError> {
        Ok(())
    }

    /// Rewrites existing assets before they are written.
    fn optimize_assets(&self, _compilation: &mut Compilation) -> Result<(), PluginError> {
        Ok(())
    }
}
