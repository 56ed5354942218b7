//! Build configuration types.
//!
//! A [`ConfigSpec`] is the serializable half of a build configuration: entry
//! points, context directory, output descriptor, module rules and plugin
//! descriptors. Plugin descriptors are plain data; turning them into live
//! plugin objects is the job of the caller that owns the plugin crates.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::options::ProcessorOptions;

/// Name given to the chunk of a single-request entry.
pub const DEFAULT_CHUNK_NAME: &str = "main";

/// Placeholder substituted with the chunk name in filename templates.
pub const NAME_PLACEHOLDER: &str = "[name]";

/// Entry points of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntrySpec {
    /// A single request, emitted as the `main` chunk.
    Single(String),
    /// Chunk name to request.
    Named(BTreeMap<String, String>),
}

impl EntrySpec {
    /// Creates a named entry map with a single chunk.
    pub fn named(chunk: impl Into<String>, request: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(chunk.into(), request.into());
        EntrySpec::Named(map)
    }

    /// Returns `(chunk name, request)` pairs sorted by chunk name.
    pub fn chunks(&self) -> Vec<(String, String)> {
        match self {
            EntrySpec::Single(request) => vec![(DEFAULT_CHUNK_NAME.to_string(), request.clone())],
            EntrySpec::Named(map) => map
                .iter()
                .map(|(name, request)| (name.clone(), request.clone()))
                .collect(),
        }
    }

    /// Returns true if no entry point is declared.
    pub fn is_empty(&self) -> bool {
        match self {
            EntrySpec::Single(_) => false,
            EntrySpec::Named(map) => map.is_empty(),
        }
    }
}

/// Where and under which names chunk assets are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSpec {
    /// Filename template for chunk assets; `[name]` is the chunk name.
    pub filename: String,
    /// Absolute output directory.
    pub path: PathBuf,
}

impl OutputSpec {
    /// Creates an output descriptor.
    pub fn new(filename: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
        }
    }

    /// Renders the filename template for a chunk.
    pub fn chunk_filename(&self, chunk: &str) -> String {
        render_filename(&self.filename, chunk)
    }
}

/// Substitutes every `[name]` in `template` with `chunk`.
pub fn render_filename(template: &str, chunk: &str) -> String {
    template.replace(NAME_PLACEHOLDER, chunk)
}

/// A single loader in a rule chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoaderSpec {
    /// Reads the stylesheet text as-is.
    Css,
    /// Inlines stylesheet text into the chunk as a style-injection statement.
    Style,
}

impl std::fmt::Display for LoaderSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderSpec::Css => write!(f, "css"),
            LoaderSpec::Style => write!(f, "style"),
        }
    }
}

/// What a matched rule does with a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleUse {
    /// Loaders applied right to left (`["style", "css"]` runs `css` first).
    Chain(Vec<LoaderSpec>),
    /// Route the module to the extraction transform.
    ///
    /// `fallback` is the loader used when extraction is not possible; `use`
    /// produces the text handed to the extraction transform.
    Extract {
        fallback: LoaderSpec,
        #[serde(rename = "use")]
        use_loader: LoaderSpec,
    },
}

/// A module rule: a path pattern and what to do with matching modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    /// Regular expression matched against the module path.
    pub test: String,
    /// Loader routing for matching modules.
    #[serde(rename = "use")]
    pub use_: RuleUse,
}

impl RuleSpec {
    /// Creates a rule routing matches through a loader chain.
    pub fn chain(test: impl Into<String>, loaders: Vec<LoaderSpec>) -> Self {
        Self {
            test: test.into(),
            use_: RuleUse::Chain(loaders),
        }
    }

    /// Creates a rule routing matches to the extraction transform.
    pub fn extract(test: impl Into<String>, fallback: LoaderSpec, use_loader: LoaderSpec) -> Self {
        Self {
            test: test.into(),
            use_: RuleUse::Extract {
                fallback,
                use_loader,
            },
        }
    }
}

/// Module handling configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleSpec {
    /// Rules in priority order; the first matching rule wins.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

/// Declarative plugin descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "plugin", rename_all = "snake_case")]
pub enum PluginSpec {
    /// Content-extraction transform writing extracted stylesheets to one file.
    ExtractCss {
        /// Destination filename; `[name]` is the chunk name.
        filename: String,
    },
    /// Stylesheet optimization with the default processor.
    OptimizeCssAssets {
        /// Pattern selecting which assets are processed.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        asset_name_regexp: Option<String>,
        /// Options forwarded to the processor.
        #[serde(default)]
        css_processor_options: ProcessorOptions,
        /// Whether per-asset size lines are logged into the build stats.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        can_print: Option<bool>,
    },
}

impl PluginSpec {
    /// Returns the plugin's display name.
    pub fn name(&self) -> &'static str {
        match self {
            PluginSpec::ExtractCss { .. } => "extract-css",
            PluginSpec::OptimizeCssAssets { .. } => "optimize-css-assets",
        }
    }
}

/// A build configuration.
///
/// `context` and `output` are optional at this level because case configs
/// usually leave them to the harness; the build engine rejects a config
/// without them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSpec {
    /// Entry points.
    pub entry: EntrySpec,

    /// Absolute directory entry requests are resolved against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<PathBuf>,

    /// Output descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputSpec>,

    /// Module rules.
    #[serde(default)]
    pub module: ModuleSpec,

    /// Plugin descriptors, in registration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<PluginSpec>,
}

impl ConfigSpec {
    /// Creates a config with the given entry and nothing else.
    pub fn new(entry: EntrySpec) -> Self {
        Self {
            entry,
            context: None,
            output: None,
            module: ModuleSpec::default(),
            plugins: Vec::new(),
        }
    }

    /// Sets the context directory.
    pub fn with_context(mut self, context: impl Into<PathBuf>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Sets the output descriptor.
    pub fn with_output(mut self, output: OutputSpec) -> Self {
        self.output = Some(output);
        self
    }

    /// Appends a module rule.
    pub fn with_rule(mut self, rule: RuleSpec) -> Self {
        self.module.rules.push(rule);
        self
    }

    /// Appends a plugin descriptor.
    pub fn with_plugin(mut self, plugin: PluginSpec) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Parses a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Serializes the config to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes the config to a JSON value.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
