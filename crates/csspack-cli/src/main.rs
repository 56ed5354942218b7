//! csspack CLI - builds stylesheets and runs golden-fixture cases

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use csspack_cli::commands;
use csspack_cli::commands::cases::CasesOptions;

mod cli_args;

use cli_args::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            config,
            context,
            out,
            json,
        } => commands::build::run(&config, context.as_deref(), out.as_deref(), json),
        Commands::Cases {
            root,
            out,
            snapshots,
            cases,
            update_snapshots,
            strict,
            json,
        } => commands::cases::run(&CasesOptions {
            root: PathBuf::from(root),
            out: out.map(PathBuf::from),
            snapshots: snapshots.map(PathBuf::from),
            cases,
            update_snapshots,
            strict,
            json,
        }),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
