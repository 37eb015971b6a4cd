//! External build and test commands
//!
//! Commands run to completion in a repository folder with output captured.
//! A command that cannot be started at all reports [`SPAWN_FAILURE_CODE`].

use std::collections::HashSet;
use std::path::Path;
use std::process::Command;

/// Exit code reported when a command cannot be spawned.
pub const SPAWN_FAILURE_CODE: i32 = 100;

/// Remembers which diagnostic blocks were already echoed during a run, so
/// repeated identical stderr output is shown once.
#[derive(Debug, Default)]
pub struct OutputDedup {
    seen: HashSet<String>,
}

impl OutputDedup {
    pub fn new() -> Self {
        Self::default()
    }

    /// True the first time `output` is offered since the last reset.
    pub fn first_sighting(&mut self, output: &str) -> bool {
        self.seen.insert(output.to_string())
    }

    pub fn reset(&mut self) {
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs commands inside repository folders and echoes their output.
#[derive(Debug, Default)]
pub struct CommandRunner {
    verbose: bool,
    dedup: OutputDedup,
}

impl CommandRunner {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            dedup: OutputDedup::new(),
        }
    }

    /// Forget echoed diagnostics, starting a fresh run.
    pub fn reset(&mut self) {
        self.dedup.reset();
    }

    /// Run `command` with `dir` as its working directory.
    ///
    /// Stdout is echoed when `echo_stdout` is set or in verbose mode. Stderr
    /// is echoed in verbose mode, and otherwise only the first time a given
    /// block of it is seen.
    pub fn run_in(&mut self, dir: &Path, command: &[&str], echo_stdout: bool) -> CommandOutcome {
        let command_line = command.join(" ");
        let Some((program, args)) = command.split_first() else {
            tracing::warn!(path = %dir.display(), "Empty command");
            return spawn_failure();
        };

        tracing::info!(command = %command_line, path = %dir.display(), "Executing");

        let output = match Command::new(program).args(args).current_dir(dir).output() {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(
                    command = %command_line,
                    path = %dir.display(),
                    error = %e,
                    "Failed to start command"
                );
                return spawn_failure();
            }
        };

        let outcome = CommandOutcome {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if (echo_stdout || self.verbose) && !outcome.stdout.is_empty() {
            print!("{}", outcome.stdout);
        }
        if !outcome.stderr.is_empty()
            && (self.verbose || self.dedup.first_sighting(&outcome.stderr))
        {
            eprint!("{}", outcome.stderr);
        }

        tracing::debug!(command = %command_line, code = outcome.code, "Command finished");
        outcome
    }
}

fn spawn_failure() -> CommandOutcome {
    CommandOutcome {
        code: SPAWN_FAILURE_CODE,
        stdout: String::new(),
        stderr: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_dedup_reports_first_sighting_only() {
        let mut dedup = OutputDedup::new();

        assert!(dedup.first_sighting("make: *** No rule to make target"));
        assert!(!dedup.first_sighting("make: *** No rule to make target"));
        assert!(dedup.first_sighting("other"));
        assert_eq!(dedup.len(), 2);

        dedup.reset();
        assert!(dedup.is_empty());
        assert!(dedup.first_sighting("other"));
    }

    #[test]
    fn test_run_captures_exit_code_and_output() {
        let dir = TempDir::new().unwrap();
        let mut runner = CommandRunner::new(false);

        let outcome = runner.run_in(dir.path(), &["sh", "-c", "echo built; exit 3"], false);

        assert_eq!(outcome.code, 3);
        assert_eq!(outcome.stdout, "built\n");
        assert!(!outcome.success());
    }

    #[test]
    fn test_run_uses_folder_as_working_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker"), "").unwrap();
        let mut runner = CommandRunner::new(false);

        let outcome = runner.run_in(dir.path(), &["ls"], false);

        assert!(outcome.success());
        assert!(outcome.stdout.contains("marker"));
    }

    #[test]
    fn test_unknown_program_maps_to_sentinel() {
        let dir = TempDir::new().unwrap();
        let mut runner = CommandRunner::new(false);

        let outcome = runner.run_in(dir.path(), &["morq-no-such-program"], false);

        assert_eq!(outcome.code, SPAWN_FAILURE_CODE);
    }

    #[test]
    fn test_missing_folder_maps_to_sentinel() {
        let dir = TempDir::new().unwrap();
        let mut runner = CommandRunner::new(false);

        let outcome = runner.run_in(&dir.path().join("gone"), &["true"], false);

        assert_eq!(outcome.code, SPAWN_FAILURE_CODE);
    }

    #[test]
    fn test_empty_command_maps_to_sentinel() {
        let dir = TempDir::new().unwrap();
        let mut runner = CommandRunner::new(false);

        assert_eq!(runner.run_in(dir.path(), &[], false).code, SPAWN_FAILURE_CODE);
    }
}
