//! Completions command implementation

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;
use crate::error::Result;

/// Write the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, out: &mut impl Write) {
    clap_complete::generate(shell, &mut Cli::command(), "morq", out);
}

/// Print the completion script for `shell`. Needs no manifest.
pub fn run_completions(shell: Shell) -> Result<i32> {
    let mut stdout = io::stdout();
    write_completions(shell, &mut stdout);
    stdout.flush()?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Shell::Bash)]
    #[case(Shell::Zsh)]
    #[case(Shell::Fish)]
    fn test_script_mentions_subcommands(#[case] shell: Shell) {
        let mut buffer = Vec::new();
        write_completions(shell, &mut buffer);
        let script = String::from_utf8(buffer).unwrap();

        assert!(script.contains("morq"), "{shell:?} script: {script}");
        assert!(script.contains("purge"), "{shell:?} script: {script}");
    }
}
