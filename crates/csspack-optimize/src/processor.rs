//! The stylesheet processing hook and the default processor.

use csspack_spec::{ProcessorOptions, TO_KEY};

use crate::error::{ProcessorError, ProcessorResult};

/// Option path that turns on comment removal in [`CommentStripper`].
pub const REMOVE_ALL_COMMENTS: [&str; 2] = ["discardComments", "removeAll"];

/// Output of one processor call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedCss {
    /// Replacement stylesheet text, written verbatim.
    pub css: String,
}

impl ProcessedCss {
    /// Wraps processed text.
    pub fn new(css: impl Into<String>) -> Self {
        Self { css: css.into() }
    }
}

/// Arguments of a single processor call, as seen by the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorInvocation {
    /// Stylesheet text passed in.
    pub css: String,
    /// Options passed in, with `from`/`to` already forced.
    pub options: ProcessorOptions,
}

/// A stylesheet transform called once per qualifying asset.
///
/// `options` always carries `from` and `to` set to the asset name, replacing
/// whatever the plugin was configured with.
pub trait CssProcessor: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str {
        "css-processor"
    }

    /// Processes one stylesheet.
    fn process(&self, css: &str, options: &ProcessorOptions) -> ProcessorResult<ProcessedCss>;
}

/// Default processor.
///
/// Returns the stylesheet unchanged unless `discardComments.removeAll` is
/// `true`, in which case `/* ... */` comments outside string literals are
/// removed. It does not minify.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentStripper;

impl CommentStripper {
    /// Creates the processor.
    pub fn new() -> Self {
        Self
    }
}

impl CssProcessor for CommentStripper {
    fn name(&self) -> &str {
        "comment-stripper"
    }

    fn process(&self, css: &str, options: &ProcessorOptions) -> ProcessorResult<ProcessedCss> {
        if let Some(value) = options.get(REMOVE_ALL_COMMENTS[0]) {
            if !value.is_object() && !value.is_boolean() {
                return Err(ProcessorError::invalid_option(
                    REMOVE_ALL_COMMENTS[0],
                    format!("expected an object, got {}", value),
                ));
            }
        }
        if !options.is_enabled(&REMOVE_ALL_COMMENTS) {
            return Ok(ProcessedCss::new(css));
        }

        let source_name = options
            .get(TO_KEY)
            .and_then(|v| v.as_str())
            .unwrap_or("<input>");
        strip_comments(css, source_name).map(ProcessedCss::new)
    }
}

/// Removes block comments, leaving quoted strings untouched.
fn strip_comments(css: &str, source_name: &str) -> ProcessorResult<String> {
    let mut out = String::with_capacity(css.len());
    let mut chars = css.char_indices().peekable();
    let mut quote: Option<char> = None;

    while let Some((index, c)) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some((_, escaped)) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                let body_start = index + 2;
                match css[body_start..].find("*/") {
                    Some(end) => {
                        let resume = body_start + end + 2;
                        while matches!(chars.peek(), Some((i, _)) if *i < resume) {
                            chars.next();
                        }
                    }
                    None => {
                        let line = css[..index].matches('\n').count() + 1;
                        return Err(ProcessorError::syntax(
                            source_name,
                            line,
                            "unterminated comment",
                        ));
                    }
                }
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}
