//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use morq_core::DEFAULT_MANIFEST_FILE;

/// morq - Keep a super-repo's checkouts in line with its manifest
#[derive(Parser, Debug)]
#[command(name = "morq")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Manifest describing the repositories
    #[arg(
        short,
        long = "manifest-file",
        global = true,
        env = "MORQ_MANIFEST",
        default_value = DEFAULT_MANIFEST_FILE
    )]
    pub manifest_file: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Clone missing repositories and bring all of them to their declared reference
    ///
    /// Examples:
    ///   morq update                 # Converge every repository
    ///   morq init                   # Same, for a fresh checkout of the super-repo
    ///   morq update --json          # Records as JSON for scripting
    #[command(visible_alias = "init")]
    Update {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Report drift between the manifest and local checkouts without changing anything
    Check {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Install every repository (make install, or pip for python repositories)
    Build,

    /// Run make develop and make test in every repository
    Test,

    /// List declared repositories
    List,

    /// Delete every declared checkout. There is no confirmation.
    Purge,

    /// Generate shell completions
    ///
    /// Examples:
    ///   morq completions bash > ~/.local/share/bash-completion/completions/morq
    ///   morq completions zsh > ~/.zfunc/_morq
    ///   morq completions fish > ~/.config/fish/completions/morq.fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
