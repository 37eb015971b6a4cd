//! Per-run report collection
//!
//! Every operation that walks the manifest gathers one record per repository
//! into a [`Report`]. Rendering is left to the caller; the report only knows
//! its column headers and how to turn records into text cells.

use serde::Serialize;

/// A record that can be laid out as one table row.
pub trait Tabular {
    /// Cell text in column order.
    fn cells(&self) -> Vec<String>;
}

/// Records of one run, in manifest order, plus the number of failed steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report<R> {
    #[serde(skip)]
    columns: Vec<&'static str>,
    records: Vec<R>,
    #[serde(skip)]
    failures: u32,
}

impl<R: Tabular> Report<R> {
    pub fn new(columns: &[&'static str]) -> Self {
        Self {
            columns: columns.to_vec(),
            records: Vec::new(),
            failures: 0,
        }
    }

    pub fn push(&mut self, record: R) {
        self.records.push(record);
    }

    /// Count `count` failed steps towards the run's exit status.
    pub fn add_failures(&mut self, count: u32) {
        self.failures = self.failures.saturating_add(count);
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows of cells, each padded or cut to the column count.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|record| {
                let mut cells = record.cells();
                cells.resize(self.columns.len(), String::new());
                cells
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Serialize)]
    struct Row(&'static str, Option<&'static str>);

    impl Tabular for Row {
        fn cells(&self) -> Vec<String> {
            std::iter::once(self.0)
                .chain(self.1)
                .map(str::to_string)
                .collect()
        }
    }

    #[test]
    fn test_rows_match_column_count() {
        let mut report = Report::new(&["folder", "status"]);
        report.push(Row("alpha", Some("OK")));
        report.push(Row("beta", None));

        assert_eq!(
            report.rows(),
            vec![
                vec!["alpha".to_string(), "OK".to_string()],
                vec!["beta".to_string(), String::new()],
            ]
        );
    }

    #[test]
    fn test_failures_accumulate() {
        let mut report: Report<Row> = Report::new(&["folder"]);
        report.add_failures(1);
        report.add_failures(2);

        assert_eq!(report.failures(), 3);
        assert!(report.is_empty());
    }

    #[test]
    fn test_serializes_records_only() {
        let mut report = Report::new(&["folder"]);
        report.push(Row("alpha", None));

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value, serde_json::json!({ "records": [["alpha", null]] }));
    }
}
