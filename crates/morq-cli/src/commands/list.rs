//! List command implementation

use morq_core::{ManifestEntry, Report, Tabular, Workspace};

use crate::error::Result;
use crate::table;

const LIST_COLUMNS: [&str; 2] = ["url", "ref"];

struct Declared<'a>(&'a ManifestEntry);

impl Tabular for Declared<'_> {
    fn cells(&self) -> Vec<String> {
        vec![self.0.url.clone(), self.0.reference.clone()]
    }
}

/// Print the declared url and reference of every repository.
pub fn run_list(workspace: &Workspace, colorize: bool) -> Result<i32> {
    let mut report = Report::new(&LIST_COLUMNS);
    for entry in workspace.manifest().entries() {
        report.push(Declared(entry));
    }
    print!("{}", table::render_report(&report, colorize));
    Ok(0)
}
