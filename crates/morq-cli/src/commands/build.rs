//! Build and test command implementations

use morq_core::{Builder, Workspace};

use super::exit_code;
use crate::error::Result;
use crate::table;

pub fn run_build(workspace: &Workspace, verbose: bool, colorize: bool) -> Result<i32> {
    let report = Builder::new(workspace, verbose).build_all();
    print!("{}", table::render_report(&report, colorize));
    tracing::debug!(failures = report.failures(), "Build finished");
    Ok(exit_code(report.failures()))
}

pub fn run_test(workspace: &Workspace, verbose: bool, colorize: bool) -> Result<i32> {
    let report = Builder::new(workspace, verbose).test_all();
    print!("{}", table::render_report(&report, colorize));
    tracing::debug!(failures = report.failures(), "Tests finished");
    Ok(exit_code(report.failures()))
}
