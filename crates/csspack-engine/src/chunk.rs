//! Chunks, their modules, and chunk asset rendering.

use csspack_spec::LoaderSpec;

/// What a module contributes to its chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleKind {
    /// Script source copied into the chunk.
    Script { source: String },
    /// Stylesheet text exported as a string (a bare `css` loader chain).
    CssExport { css: String },
    /// Stylesheet injected at runtime (a `style` loader chain).
    InlineStyle { css: String },
    /// Stylesheet handed to the extraction transform.
    Extracted { css: String },
}

/// A module as it appears in a chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRecord {
    /// Stable id: the path relative to the context, `./`-prefixed.
    pub id: String,
    /// Module content after loaders ran.
    pub kind: ModuleKind,
}

/// A named entry chunk and the modules reachable from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Chunk name.
    pub name: String,
    /// Asset name the chunk script is emitted under.
    pub filename: String,
    /// Modules in depth-first visit order; the entry module comes first.
    pub modules: Vec<ModuleRecord>,
}

impl Chunk {
    /// Creates an empty chunk.
    pub fn new(name: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            modules: Vec::new(),
        }
    }

    /// Stylesheets routed to extraction, in module order.
    pub fn extracted_styles(&self) -> Vec<(&str, &str)> {
        self.modules
            .iter()
            .filter_map(|m| match &m.kind {
                ModuleKind::Extracted { css } => Some((m.id.as_str(), css.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Renders the chunk script.
    ///
    /// Output depends only on the chunk's modules, so two builds of the same
    /// sources produce byte-identical chunk assets.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("/* csspack chunk: {} */\n", self.name));
        for module in &self.modules {
            match &module.kind {
                ModuleKind::Script { source } => {
                    out.push_str(&format!("/* module: {} */\n", module.id));
                    out.push_str(source);
                    if !source.ends_with('\n') {
                        out.push('\n');
                    }
                }
                ModuleKind::CssExport { css } => {
                    out.push_str(&format!("/* module: {} */\n", module.id));
                    out.push_str(&format!("module.exports = {};\n", js_string(css)));
                }
                ModuleKind::InlineStyle { css } => {
                    out.push_str(&format!("/* module: {} */\n", module.id));
                    out.push_str(&format!("__csspack_inject_style__({});\n", js_string(css)));
                }
                ModuleKind::Extracted { .. } => {
                    out.push_str(&format!("/* module: {} (extracted) */\n", module.id));
                }
            }
        }
        out
    }
}

/// Applies a loader chain right to left to a module's raw text.
///
/// `css` turns raw text into stylesheet text; `style` turns stylesheet text
/// into a runtime injection. Running `style` on raw text is an error.
pub fn apply_loaders(raw: &str, loaders: &[LoaderSpec]) -> Result<ModuleKind, String> {
    enum Value {
        Raw(String),
        Css(String),
        Injected(String),
    }

    let mut value = Value::Raw(raw.to_string());
    for loader in loaders.iter().rev() {
        value = match (loader, value) {
            (LoaderSpec::Css, Value::Raw(text)) | (LoaderSpec::Css, Value::Css(text)) => {
                Value::Css(text)
            }
            (LoaderSpec::Style, Value::Css(text)) => Value::Injected(text),
            (loader, Value::Raw(_)) => {
                return Err(format!(
                    "'{}' loader expects stylesheet input; put 'css' after it in the chain",
                    loader
                ))
            }
            (loader, Value::Injected(_)) => {
                return Err(format!(
                    "'{}' loader cannot run after 'style' in the chain",
                    loader
                ))
            }
        };
    }

    match value {
        Value::Raw(text) => Ok(ModuleKind::Script { source: text }),
        Value::Css(css) => Ok(ModuleKind::CssExport { css }),
        Value::Injected(css) => Ok(ModuleKind::InlineStyle { css }),
    }
}

/// Quotes text as a double-quoted script string literal.
fn js_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < '\x20' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
