//! Build driver.
//!
//! A build runs these phases in order, with no partial results observable
//! from outside:
//!
//! 1. validate the configuration (failure is a [`BuildError`]),
//! 2. build every chunk: resolve the entry, walk script requests
//!    depth-first, run matched loader chains,
//! 3. render chunk scripts as assets,
//! 4. run plugin hooks (`additional_assets`, then `optimize_assets`),
//! 5. write every asset to the output directory.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use csspack_spec::{
    validate_for_build, ConfigError, ConfigSpec, ErrorCode, LoaderSpec, RuleUse, ValidationError,
};
use regex::Regex;

use crate::chunk::{apply_loaders, Chunk, ModuleKind, ModuleRecord};
use crate::compilation::Compilation;
use crate::error::BuildError;
use crate::plugin::Plugin;
use crate::resolve::{discover_requests, is_script, module_id, resolve_request};
use crate::stats::{Stats, COMPILATION_ORIGIN};

/// A configuration plus live plugin objects.
///
/// `spec.plugins` descriptors are not read by the engine; whoever builds the
/// `BuildConfig` turns them into plugin objects.
#[derive(Clone)]
pub struct BuildConfig {
    /// Serializable configuration.
    pub spec: ConfigSpec,
    /// Plugins in registration order.
    pub plugins: Vec<Arc<dyn Plugin>>,
}

impl BuildConfig {
    /// Creates a build config without plugins.
    pub fn new(spec: ConfigSpec) -> Self {
        Self {
            spec,
            plugins: Vec::new(),
        }
    }

    /// Registers a plugin.
    pub fn with_plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    /// Registers a plugin the caller keeps a handle to.
    pub fn with_shared_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }
}

impl fmt::Debug for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.plugins.iter().map(|p| p.name()).collect();
        f.debug_struct("BuildConfig")
            .field("spec", &self.spec)
            .field("plugins", &names)
            .finish()
    }
}

struct CompiledRule {
    test: Regex,
    use_: RuleUse,
}

/// Runs builds for one configuration.
#[derive(Debug, Clone)]
pub struct Compiler {
    config: BuildConfig,
}

impl Compiler {
    /// Creates a compiler.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// The configuration this compiler builds.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Runs the build and reports completion exactly once through `callback`.
    pub fn run<F>(&self, callback: F)
    where
        F: FnOnce(Result<Stats, BuildError>),
    {
        callback(self.compile());
    }

    /// Runs the build.
    ///
    /// `Err` means the build could not run. A build that ran but found
    /// problems returns `Ok` with error diagnostics in the stats.
    pub fn compile(&self) -> Result<Stats, BuildError> {
        let spec = &self.config.spec;
        validate_for_build(spec).into_result()?;

        let (context, output) = match (&spec.context, &spec.output) {
            (Some(context), Some(output)) => (context.clone(), output.clone()),
            _ => {
                return Err(BuildError::InvalidConfig(ConfigError::Invalid(vec![
                    ValidationError::new(
                        ErrorCode::MissingOutput,
                        "context and output are required",
                    ),
                ])))
            }
        };
        let rules = compile_rules(spec)?;
        let extraction_available = self.config.plugins.iter().any(|p| p.extracts_styles());

        let mut compilation = Compilation::new(output.path.clone());
        let builder = ChunkBuilder {
            context: &context,
            rules: &rules,
            extraction_available,
        };

        for (name, request) in spec.entry.chunks() {
            let chunk = builder.build(&name, &request, &output.chunk_filename(&name), &mut compilation);
            compilation.push_chunk(chunk);
        }

        let rendered: Vec<(String, String, String)> = compilation
            .chunks()
            .iter()
            .map(|c| (c.filename.clone(), c.render(), format!("chunk:{}", c.name)))
            .collect();
        for (filename, source, origin) in rendered {
            compilation.emit_asset(filename, source, origin);
        }

        for plugin in &self.config.plugins {
            if let Err(e) = plugin.additional_assets(&mut compilation) {
                compilation.error(plugin.name(), e.message);
            }
        }
        for plugin in &self.config.plugins {
            if let Err(e) = plugin.optimize_assets(&mut compilation) {
                compilation.error(plugin.name(), e.message);
            }
        }

        emit_assets(&compilation)?;
        Ok(compilation.to_stats())
    }
}

fn compile_rules(spec: &ConfigSpec) -> Result<Vec<CompiledRule>, BuildError> {
    spec.module
        .rules
        .iter()
        .enumerate()
        .map(|(index, rule)| {
            let test = Regex::new(&rule.test).map_err(|e| {
                ConfigError::Invalid(vec![ValidationError::with_path(
                    ErrorCode::InvalidRuleTest,
                    e.to_string(),
                    format!("module.rules[{}].test", index),
                )])
            })?;
            Ok(CompiledRule {
                test,
                use_: rule.use_.clone(),
            })
        })
        .collect()
}

struct ChunkBuilder<'a> {
    context: &'a Path,
    rules: &'a [CompiledRule],
    extraction_available: bool,
}

impl ChunkBuilder<'_> {
    fn build(
        &self,
        name: &str,
        request: &str,
        filename: &str,
        compilation: &mut Compilation,
    ) -> Chunk {
        let mut chunk = Chunk::new(name, filename);
        let entry_request = if request.starts_with("./")
            || request.starts_with("../")
            || request.starts_with('/')
        {
            request.to_string()
        } else {
            format!("./{}", request)
        };

        match resolve_request(self.context, &entry_request) {
            Some(path) => {
                let mut visited = HashSet::new();
                self.visit(&path, &mut visited, &mut chunk, compilation);
            }
            None => compilation.error(
                COMPILATION_ORIGIN,
                format!(
                    "Entry module not found: can't resolve '{}' in '{}' (chunk '{}')",
                    request,
                    self.context.display(),
                    name
                ),
            ),
        }
        chunk
    }

    fn visit(
        &self,
        path: &Path,
        visited: &mut HashSet<PathBuf>,
        chunk: &mut Chunk,
        compilation: &mut Compilation,
    ) {
        if !visited.insert(path.to_path_buf()) {
            return;
        }
        let id = module_id(self.context, path);

        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                compilation.error(id, format!("Module build failed: {}", e));
                return;
            }
        };

        let kind = match self.rules.iter().find(|r| r.test.is_match(&id)) {
            Some(rule) => match self.apply_rule(&rule.use_, &raw, &id, compilation) {
                Ok(kind) => kind,
                Err(message) => {
                    compilation.error(id, format!("Module build failed: {}", message));
                    return;
                }
            },
            None if is_script(path) => ModuleKind::Script { source: raw },
            None => {
                compilation.error(
                    id,
                    "Module parse failed: You may need an appropriate loader to handle this file type.",
                );
                return;
            }
        };

        let requests = match &kind {
            ModuleKind::Script { source } => discover_requests(source),
            _ => Vec::new(),
        };
        chunk.modules.push(ModuleRecord { id: id.clone(), kind });

        let base_dir = path.parent().unwrap_or(self.context);
        for request in requests {
            match resolve_request(base_dir, &request) {
                Some(dep) => self.visit(&dep, visited, chunk, compilation),
                None => compilation.error(
                    id.clone(),
                    format!(
                        "Module not found: Error: Can't resolve '{}' in '{}'",
                        request,
                        base_dir.display()
                    ),
                ),
            }
        }
    }

    fn apply_rule(
        &self,
        use_: &RuleUse,
        raw: &str,
        id: &str,
        compilation: &mut Compilation,
    ) -> Result<ModuleKind, String> {
        match use_ {
            RuleUse::Chain(loaders) => apply_loaders(raw, loaders),
            RuleUse::Extract {
                fallback,
                use_loader,
            } => {
                let css = match apply_loaders(raw, &[*use_loader])? {
                    ModuleKind::CssExport { css } => css,
                    _ => return Err(format!("'{}' loader produced no stylesheet", use_loader)),
                };
                if self.extraction_available {
                    Ok(ModuleKind::Extracted { css })
                } else {
                    compilation.error(
                        id,
                        format!(
                            "Module is marked for extraction but no extraction plugin is registered; rendered with fallback loader '{}'",
                            fallback
                        ),
                    );
                    fallback_kind(*fallback, css)
                }
            }
        }
    }
}

fn fallback_kind(fallback: LoaderSpec, css: String) -> Result<ModuleKind, String> {
    match fallback {
        LoaderSpec::Style => Ok(ModuleKind::InlineStyle { css }),
        LoaderSpec::Css => Ok(ModuleKind::CssExport { css }),
    }
}

fn emit_assets(compilation: &Compilation) -> Result<(), BuildError> {
    let output_path = compilation.output_path();
    fs::create_dir_all(output_path).map_err(|source| BuildError::OutputDir {
        path: output_path.to_path_buf(),
        source,
    })?;

    for (name, asset) in compilation.assets() {
        let path = output_path.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| BuildError::OutputDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, &asset.source).map_err(|source| BuildError::Emit { path, source })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractCssPlugin;
    use crate::stats::Severity;
    use csspack_spec::{EntrySpec, OutputSpec, RuleSpec};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    struct Project {
        src: TempDir,
        out: TempDir,
    }

    impl Project {
        fn new(files: &[(&str, &str)]) -> Self {
            let src = tempfile::tempdir().unwrap();
            for (name, content) in files {
                let path = src.path().join(name);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(path, content).unwrap();
            }
            Self {
                src,
                out: tempfile::tempdir().unwrap(),
            }
        }

        fn spec(&self) -> ConfigSpec {
            ConfigSpec::new(EntrySpec::named("test", "./index.js"))
                .with_context(self.src.path())
                .with_output(OutputSpec::new("[name].js", self.out.path()))
        }

        fn read(&self, name: &str) -> String {
            fs::read_to_string(self.out.path().join(name)).unwrap()
        }
    }

    fn extract_rule() -> RuleSpec {
        RuleSpec::extract("\\.css$", LoaderSpec::Style, LoaderSpec::Css)
    }

    #[test]
    fn test_extracts_css_to_destination() {
        let project = Project::new(&[
            ("index.js", "require('./a.css');\nrequire('./b.css');\n"),
            ("a.css", "a{color:red}"),
            ("b.css", "b{color:blue}"),
        ]);
        let config = BuildConfig::new(project.spec().with_rule(extract_rule()))
            .with_plugin(ExtractCssPlugin::new("test.css"));

        let stats = Compiler::new(config).compile().unwrap();
        assert!(!stats.has_errors(), "{}", stats);
        assert_eq!(project.read("test.css"), "a{color:red}\nb{color:blue}");
        assert_eq!(
            project.read("test.js"),
            "/* csspack chunk: test */\n\
             /* module: ./index.js */\n\
             require('./a.css');\n\
             require('./b.css');\n\
             /* module: ./a.css (extracted) */\n\
             /* module: ./b.css (extracted) */\n"
        );
    }

    #[test]
    fn test_missing_extraction_plugin_is_an_error() {
        let project = Project::new(&[("index.js", "require('./a.css');"), ("a.css", "a{}")]);
        let config = BuildConfig::new(project.spec().with_rule(extract_rule()));

        let stats = Compiler::new(config).compile().unwrap();
        assert_eq!(stats.errors().len(), 1);
        assert_eq!(stats.errors()[0].origin, "./a.css");
        assert!(stats.errors()[0].message.contains("no extraction plugin"));
        assert!(project.read("test.js").contains("__csspack_inject_style__(\"a{}\");"));
    }

    #[test]
    fn test_missing_module_is_a_diagnostic() {
        let project = Project::new(&[("index.js", "require('./missing.css');")]);
        let stats = Compiler::new(BuildConfig::new(project.spec()))
            .compile()
            .unwrap();

        assert!(stats.has_errors());
        let error = stats.errors()[0];
        assert_eq!(error.origin, "./index.js");
        assert!(error.message.contains("Can't resolve './missing.css'"));
    }

    #[test]
    fn test_css_without_rule_is_a_diagnostic() {
        let project = Project::new(&[("index.js", "require('./a.css');"), ("a.css", "a{}")]);
        let stats = Compiler::new(BuildConfig::new(project.spec()))
            .compile()
            .unwrap();

        assert_eq!(stats.errors().len(), 1);
        assert_eq!(stats.errors()[0].origin, "./a.css");
        assert!(stats.errors()[0].message.contains("appropriate loader"));
    }

    #[test]
    fn test_missing_entry_is_a_diagnostic() {
        let project = Project::new(&[]);
        let stats = Compiler::new(BuildConfig::new(project.spec()))
            .compile()
            .unwrap();

        assert!(stats.has_errors());
        assert!(stats.errors()[0].message.contains("Entry module not found"));
    }

    #[test]
    fn test_invalid_config_is_a_build_error() {
        let spec = ConfigSpec::new(EntrySpec::named("test", "./index.js"));
        let err = Compiler::new(BuildConfig::new(spec)).compile().unwrap_err();
        assert!(matches!(err, BuildError::InvalidConfig(_)));
    }

    #[test]
    fn test_cycles_visit_each_module_once() {
        let project = Project::new(&[
            ("index.js", "require('./other');"),
            ("other.js", "require('./index.js');"),
        ]);
        let stats = Compiler::new(BuildConfig::new(project.spec()))
            .compile()
            .unwrap();

        assert!(!stats.has_errors(), "{}", stats);
        let chunk = project.read("test.js");
        assert_eq!(chunk.matches("/* module: ./index.js */").count(), 1);
        assert_eq!(chunk.matches("/* module: ./other.js */").count(), 1);
    }

    #[test]
    fn test_run_reports_once_through_callback() {
        let project = Project::new(&[("index.js", "")]);
        let compiler = Compiler::new(BuildConfig::new(project.spec()));

        let mut calls = 0;
        compiler.run(|result| {
            calls += 1;
            assert!(result.is_ok());
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_plugin_hook_error_becomes_diagnostic() {
        struct Failing;
        impl Plugin for Failing {
            fn name(&self) -> &str {
                "failing"
            }
            fn optimize_assets(
                &self,
                _compilation: &mut Compilation,
            ) -> Result<(), crate::error::PluginError> {
                Err(crate::error::PluginError::new("failing", "boom"))
            }
        }

        let project = Project::new(&[("index.js", "")]);
        let stats = Compiler::new(BuildConfig::new(project.spec()).with_plugin(Failing))
            .compile()
            .unwrap();

        assert_eq!(stats.diagnostics.len(), 1);
        assert_eq!(stats.diagnostics[0].severity, Severity::Error);
        assert_eq!(stats.diagnostics[0].origin, "failing");
        assert_eq!(stats.diagnostics[0].message, "boom");
    }

    #[test]
    fn test_builds_are_byte_identical() {
        let project = Project::new(&[("index.js", "require('./a.css');"), ("a.css", "a{}")]);
        let build = || {
            let config = BuildConfig::new(project.spec().with_rule(extract_rule()))
                .with_plugin(ExtractCssPlugin::new("[name].css"));
            Compiler::new(config).compile().unwrap()
        };

        let first = build();
        let second = build();
        assert_eq!(first.hash, second.hash);
        assert_eq!(first.assets, second.assets);
    }
}
