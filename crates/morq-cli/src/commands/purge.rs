//! Purge command implementation

use morq_core::{Workspace, purge_all};

use super::exit_code;
use crate::error::Result;
use crate::table;

/// Delete every declared checkout.
pub fn run_purge(workspace: &Workspace, colorize: bool) -> Result<i32> {
    let report = purge_all(workspace);
    print!("{}", table::render_report(&report, colorize));
    Ok(exit_code(report.failures()))
}
