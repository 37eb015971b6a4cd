//! Update (and init) command implementation

use morq_core::{ReconciliationEngine, Workspace};

use super::print_status_report;
use crate::error::Result;

/// Converge every checkout and report what changed.
///
/// Per-repository failures show up as rows; the exit code stays zero.
pub fn run_update(workspace: &Workspace, json: bool, colorize: bool) -> Result<i32> {
    let report = ReconciliationEngine::new(workspace).update_all();
    print_status_report(&report, json, colorize)?;
    Ok(0)
}
