//! Check command implementation

use morq_core::{ReconciliationEngine, Workspace};

use super::print_status_report;
use crate::error::Result;

/// Report how each checkout relates to its declared reference.
pub fn run_check(workspace: &Workspace, json: bool, colorize: bool) -> Result<i32> {
    let report = ReconciliationEngine::new(workspace).check_all();
    print_status_report(&report, json, colorize)?;
    Ok(0)
}
