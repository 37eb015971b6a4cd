//! morq CLI
//!
//! Checks, updates, builds and tests the repositories declared in a
//! super-repo manifest.

mod cli;
mod commands;
mod error;
mod logging;
mod table;

use std::io::IsTerminal;
use std::process;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use morq_core::Workspace;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(_) => print_usage(),
    };

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to set up logging: {}", "warning".yellow().bold(), e);
    }

    let Some(command) = cli.command.clone() else {
        print_usage();
    };

    match run(&cli, command) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{}: {}", "hint".cyan().bold(), hint);
            }
            process::exit(1);
        }
    }
}

/// Print help and exit successfully.
fn print_usage() -> ! {
    let _ = Cli::command().print_help();
    println!();
    process::exit(0);
}

fn run(cli: &Cli, command: Commands) -> Result<i32> {
    if let Commands::Completions { shell } = command {
        return commands::run_completions(shell);
    }

    let workspace = Workspace::open(&cli.manifest_file)?;
    let colorize = std::io::stdout().is_terminal();
    tracing::debug!(root = %workspace.root().display(), ?command, "Running command");

    match command {
        Commands::Update { json } => commands::run_update(&workspace, json, colorize),
        Commands::Check { json } => commands::run_check(&workspace, json, colorize),
        Commands::Build => commands::run_build(&workspace, cli.verbose, colorize),
        Commands::Test => commands::run_test(&workspace, cli.verbose, colorize),
        Commands::List => commands::run_list(&workspace, colorize),
        Commands::Purge => commands::run_purge(&workspace, colorize),
        Commands::Completions { shell } => commands::run_completions(shell),
    }
}
