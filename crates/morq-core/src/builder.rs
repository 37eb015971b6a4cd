//! Build and test drivers
//!
//! Both walk the manifest in order and run external commands in each
//! repository folder through a [`CommandRunner`]. A failure is recorded and
//! counted; the walk always reaches the last entry.

use std::fmt;
use std::path::Path;

use serde::{Serialize, Serializer};

use crate::manifest::ManifestEntry;
use crate::report::{Report, Tabular};
use crate::runner::CommandRunner;
use crate::workspace::Workspace;

pub const BUILD_COLUMNS: [&str; 2] = ["folder", "build"];
pub const TEST_COLUMNS: [&str; 2] = ["folder", "test"];

const MAKE_INSTALL: &[&str] = &["make", "install"];
const PIP_INSTALL: &[&str] = &["python3", "-m", "pip", "install", "."];

/// Test commands, with whether their stdout is echoed.
const TEST_STEPS: [(&[&str], bool); 2] = [(&["make", "develop"], false), (&["make", "test"], true)];

/// The `type` value that selects a pip install.
const PYTHON_KIND: &str = "python";

/// How an entry gets installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStrategy {
    /// `make install`, chosen when the folder has a Makefile
    Make,
    /// `python3 -m pip install .` for entries of type `python`
    PythonPackage,
    /// Nothing known applies
    Unavailable,
}

impl BuildStrategy {
    pub fn select(folder: &Path, entry: &ManifestEntry) -> Self {
        if folder.join("Makefile").is_file() {
            BuildStrategy::Make
        } else if entry.kind.as_deref() == Some(PYTHON_KIND) {
            BuildStrategy::PythonPackage
        } else {
            BuildStrategy::Unavailable
        }
    }

    pub fn command(&self) -> Option<&'static [&'static str]> {
        match self {
            BuildStrategy::Make => Some(MAKE_INSTALL),
            BuildStrategy::PythonPackage => Some(PIP_INSTALL),
            BuildStrategy::Unavailable => None,
        }
    }
}

/// Result of building or testing one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Ok,
    Failed,
    NoBuilder,
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StepResult::Ok => "OK",
            StepResult::Failed => "Failed",
            StepResult::NoBuilder => "N/A",
        })
    }
}

impl Serialize for StepResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub folder: String,
    pub result: StepResult,
}

impl Tabular for StepRecord {
    fn cells(&self) -> Vec<String> {
        let result = match self.result {
            StepResult::NoBuilder => format!("Builder {} N/A", self.folder),
            other => other.to_string(),
        };
        vec![self.folder.clone(), result]
    }
}

/// Runs install and test commands across a workspace.
pub struct Builder<'a> {
    workspace: &'a Workspace,
    runner: CommandRunner,
}

impl<'a> Builder<'a> {
    pub fn new(workspace: &'a Workspace, verbose: bool) -> Self {
        Self {
            workspace,
            runner: CommandRunner::new(verbose),
        }
    }

    /// Install every entry. The report's failure count is the number of
    /// entries that failed or had no builder.
    pub fn build_all(&mut self) -> Report<StepRecord> {
        self.runner.reset();
        let mut report = Report::new(&BUILD_COLUMNS);
        for entry in self.workspace.manifest().entries() {
            let (record, failures) = self.build_entry(entry);
            report.add_failures(failures);
            report.push(record);
        }
        report
    }

    /// Run the test steps for every entry. Each failed step counts once.
    pub fn test_all(&mut self) -> Report<StepRecord> {
        self.runner.reset();
        let mut report = Report::new(&TEST_COLUMNS);
        for entry in self.workspace.manifest().entries() {
            let (record, failures) = self.test_entry(entry);
            report.add_failures(failures);
            report.push(record);
        }
        report
    }

    pub fn build_entry(&mut self, entry: &ManifestEntry) -> (StepRecord, u32) {
        let folder = self.workspace.folder_path(entry);
        let strategy = BuildStrategy::select(&folder, entry);
        tracing::debug!(repo = %entry.name, ?strategy, "Selected build strategy");

        let Some(command) = strategy.command() else {
            tracing::warn!(repo = %entry.name, "No builder available");
            return (record(entry, StepResult::NoBuilder), 1);
        };

        let outcome = self.runner.run_in(&folder, command, false);
        if outcome.success() {
            (record(entry, StepResult::Ok), 0)
        } else {
            tracing::warn!(repo = %entry.name, code = outcome.code, "Build failed");
            (record(entry, StepResult::Failed), 1)
        }
    }

    pub fn test_entry(&mut self, entry: &ManifestEntry) -> (StepRecord, u32) {
        let folder = self.workspace.folder_path(entry);

        let mut failures = 0;
        for (command, echo_stdout) in TEST_STEPS {
            let outcome = self.runner.run_in(&folder, command, echo_stdout);
            if !outcome.success() {
                tracing::warn!(
                    repo = %entry.name,
                    command = %command.join(" "),
                    code = outcome.code,
                    "Test step failed"
                );
                failures += 1;
            }
        }

        let result = if failures == 0 {
            StepResult::Ok
        } else {
            StepResult::Failed
        };
        (record(entry, result), failures)
    }
}

fn record(entry: &ManifestEntry, result: StepResult) -> StepRecord {
    StepRecord {
        folder: entry.name.clone(),
        result,
    }
}
