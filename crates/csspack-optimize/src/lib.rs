//! Stylesheet asset optimization for csspack.
//!
//! [`OptimizeCssAssetsPlugin`] hooks into the engine's `optimize_assets`
//! stage and hands every stylesheet asset to a [`CssProcessor`]. The default
//! processor, [`CommentStripper`], only removes comments when asked to.
//! [`registry::instantiate`] turns the plugin descriptors of a config into
//! live plugins.
//!
//! ```
//! use csspack_optimize::{CommentStripper, CssProcessor};
//! use csspack_spec::ProcessorOptions;
//! use serde_json::json;
//!
//! let options = ProcessorOptions::new()
//!     .with("discardComments", json!({"removeAll": true}))
//!     .with_forced_paths("app.css");
//! let out = CommentStripper.process("/* banner */.a{color:red}", &options).unwrap();
//! assert_eq!(out.css, ".a{color:red}");
//! ```

pub mod error;
pub mod plugin;
pub mod processor;
pub mod registry;

pub use error::{ProcessorError, ProcessorResult};
pub use plugin::{
    OptimizeCssAssetsBuilder, OptimizeCssAssetsPlugin, DEFAULT_ASSET_NAME_REGEXP,
    OPTIMIZE_PLUGIN_NAME,
};
pub use processor::{
    CommentStripper, CssProcessor, ProcessedCss, ProcessorInvocation, REMOVE_ALL_COMMENTS,
};
pub use registry::{instantiate, plugin_from_spec};
