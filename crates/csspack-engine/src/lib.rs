//! Minimal reference build engine for csspack.
//!
//! The engine turns a [`csspack_spec::ConfigSpec`] plus a list of live
//! [`Plugin`] objects into emitted assets and a [`Stats`] summary. It covers
//! only what stylesheet post-processing needs: relative request resolution,
//! `css`/`style` loader chains, stylesheet extraction, and the
//! `additional_assets`/`optimize_assets` plugin stages.
//!
//! # Example
//!
//! ```no_run
//! use csspack_engine::{BuildConfig, Compiler, ExtractCssPlugin};
//! use csspack_spec::{ConfigSpec, EntrySpec, LoaderSpec, OutputSpec, RuleSpec};
//!
//! let spec = ConfigSpec::new(EntrySpec::named("main", "./index.js"))
//!     .with_context("/project/src")
//!     .with_output(OutputSpec::new("[name].js", "/project/dist"))
//!     .with_rule(RuleSpec::extract("\\.css$", LoaderSpec::Style, LoaderSpec::Css));
//! let config = BuildConfig::new(spec).with_plugin(ExtractCssPlugin::new("[name].css"));
//!
//! Compiler::new(config).run(|result| match result {
//!     Ok(stats) => println!("{}", stats),
//!     Err(e) => eprintln!("build failed: {}", e),
//! });
//! ```
//!
//! # Modules
//!
//! - [`chunk`]: Chunks, module records, loader chains, chunk rendering
//! - [`compilation`]: Build state shared with plugin hooks
//! - [`compiler`]: Build driver
//! - [`error`]: Build and plugin errors
//! - [`extract`]: Stylesheet extraction plugin
//! - [`plugin`]: Plugin hook trait
//! - [`resolve`]: Request discovery and resolution
//! - [`stats`]: Diagnostics and asset summary

pub mod chunk;
pub mod compilation;
pub mod compiler;
pub mod error;
pub mod extract;
pub mod plugin;
pub mod resolve;
pub mod stats;

pub use chunk::{apply_loaders, Chunk, ModuleKind, ModuleRecord};
pub use compilation::{Asset, Compilation};
pub use compiler::{BuildConfig, Compiler};
pub use error::{BuildError, PluginError};
pub use extract::{ExtractCssPlugin, EXTRACT_PLUGIN_NAME};
pub use plugin::Plugin;
pub use stats::{AssetInfo, Diagnostic, Severity, Stats, COMPILATION_ORIGIN};
