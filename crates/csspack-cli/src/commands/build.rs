//! Build command implementation
//!
//! Loads a JSON build configuration, instantiates its plugins and runs one
//! build.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use csspack_engine::{Compiler, Stats};
use csspack_optimize::instantiate;
use csspack_spec::{ConfigSpec, OutputSpec};

use super::json_output::{error_codes, BuildOutput, JsonError};

/// Output filename template used when `--out` is given and the config has no
/// output section.
pub const DEFAULT_OUTPUT_FILENAME: &str = "[name].js";

/// Run the build command
///
/// # Arguments
/// * `config_path` - Path to the JSON build configuration
/// * `context` - Overrides the config's context directory
/// * `out` - Overrides the config's output directory
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on a clean build, 1 if the build reported errors
pub fn run(
    config_path: &str,
    context: Option<&str>,
    out: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        run_json(config_path, context, out)
    } else {
        run_human(config_path, context, out)
    }
}

fn run_human(config_path: &str, context: Option<&str>, out: Option<&str>) -> Result<ExitCode> {
    println!("{} {}", "Building:".cyan().bold(), config_path);

    let spec = load_config(Path::new(config_path), context, out)?;
    let config = instantiate(spec)
        .with_context(|| format!("Failed to configure plugins from {}", config_path))?;
    let stats = Compiler::new(config)
        .compile()
        .with_context(|| format!("Build failed to run: {}", config_path))?;

    print_stats(&stats);

    if stats.has_errors() {
        println!(
            "\n{} Build reported {} error(s)",
            "FAILED".red().bold(),
            stats.errors().len()
        );
        Ok(ExitCode::from(1))
    } else {
        println!(
            "\n{} Built {} asset(s) into {}",
            "SUCCESS".green().bold(),
            stats.assets.len(),
            stats.output_path.display()
        );
        Ok(ExitCode::SUCCESS)
    }
}

fn run_json(config_path: &str, context: Option<&str>, out: Option<&str>) -> Result<ExitCode> {
    let output = match build_json(config_path, context, out) {
        Ok(stats) => BuildOutput::from_stats(&stats),
        Err(error) => BuildOutput::failure(vec![error.with_file(config_path)]),
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize build output")?
    );
    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn build_json(
    config_path: &str,
    context: Option<&str>,
    out: Option<&str>,
) -> std::result::Result<Stats, JsonError> {
    let spec = load_config(Path::new(config_path), context, out)
        .map_err(|e| JsonError::new(error_codes::PATH_RESOLVE, format!("{:#}", e)))?;
    let config = instantiate(spec).map_err(|e| JsonError::from_pipeline(&e))?;
    Compiler::new(config)
        .compile()
        .map_err(|e| JsonError::from_pipeline(&e))
}

/// Loads a config and applies command-line overrides.
///
/// Relative paths inside the file resolve against the file's directory;
/// relative paths on the command line resolve against the working directory.
/// Without any context the config file's directory is used.
pub fn load_config(
    config_path: &Path,
    context: Option<&str>,
    out: Option<&str>,
) -> Result<ConfigSpec> {
    let mut spec = ConfigSpec::from_file(config_path)
        .with_context(|| format!("Failed to load config file: {}", config_path.display()))?;

    let config_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let config_dir = absolutize(&config_dir)?;
    let cwd = env::current_dir().context("Failed to read working directory")?;

    spec.context = Some(match context {
        Some(dir) => cwd.join(dir),
        None => match spec.context.take() {
            Some(dir) => config_dir.join(dir),
            None => config_dir.clone(),
        },
    });

    spec.output = match (out, spec.output.take()) {
        (Some(dir), Some(output)) => Some(OutputSpec::new(output.filename, cwd.join(dir))),
        (Some(dir), None) => Some(OutputSpec::new(DEFAULT_OUTPUT_FILENAME, cwd.join(dir))),
        (None, Some(output)) => Some(OutputSpec::new(
            output.filename,
            config_dir.join(output.path),
        )),
        (None, None) => None,
    };

    Ok(spec)
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = env::current_dir().context("Failed to read working directory")?;
    Ok(cwd.join(path))
}

fn print_stats(stats: &Stats) {
    println!("{} {}", "Hash:".dimmed(), stats.hash.chars().take(20).collect::<String>());
    for asset in &stats.assets {
        println!(
            "  {} {} ({} bytes, {})",
            "+".green(),
            asset.name,
            asset.size,
            asset.origin.dimmed()
        );
    }
    for error in stats.errors() {
        println!("{} in {}\n  {}", "error".red().bold(), error.origin, error.message);
    }
    for warning in stats.warnings() {
        println!(
            "{} in {}\n  {}",
            "warning".yellow().bold(),
            warning.origin,
            warning.message
        );
    }
    for log in stats.logs() {
        println!("  {} {}", log.origin.dimmed(), log.message);
    }
}
