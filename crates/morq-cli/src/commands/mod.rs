//! Command implementations for morq-cli
//!
//! Each command takes an opened workspace and returns the process exit code.

pub mod build;
pub mod check;
pub mod completions;
pub mod list;
pub mod purge;
pub mod update;

pub use build::{run_build, run_test};
pub use check::run_check;
pub use completions::run_completions;
pub use list::run_list;
pub use purge::run_purge;
pub use update::run_update;

use morq_core::{Report, StatusRecord};

use crate::error::Result;
use crate::table;

/// Print a check or update report as a table, or as JSON records.
fn print_status_report(report: &Report<StatusRecord>, json: bool, colorize: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report.records())?);
    } else {
        print!("{}", table::render_report(report, colorize));
    }
    Ok(())
}

/// Exit code for a number of failed steps: zero, or clamped to `1..=255`.
pub fn exit_code(failures: u32) -> i32 {
    failures.min(255) as i32
}
