//! Bordered text tables for reports
//!
//! ```text
//! +--------+------+----------+--------+
//! | folder | ref  | position | status |
//! +--------+------+----------+--------+
//! | core   | main | main     | OK     |
//! +--------+------+----------+--------+
//! ```
//!
//! Status words are colored after padding, so alignment never depends on
//! escape codes.

use colored::{ColoredString, Colorize};
use morq_core::{Report, Tabular};

/// Render `report` as a table.
pub fn render_report<R: Tabular>(report: &Report<R>, colorize: bool) -> String {
    render(report.columns(), &report.rows(), colorize)
}

/// Render `columns` and `rows` as a table. Every row must have one cell per
/// column.
pub fn render(columns: &[&str], rows: &[Vec<String>], colorize: bool) -> String {
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, heading)| {
            rows.iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(heading.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let separator = separator(&widths);
    let mut output = String::new();

    output.push_str(&separator);
    output.push_str(&line(columns.iter().copied(), &widths, false));
    output.push_str(&separator);
    for row in rows {
        output.push_str(&line(row.iter().map(String::as_str), &widths, colorize));
    }
    output.push_str(&separator);

    output
}

fn separator(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize], colorize: bool) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.zip(widths) {
        let padding = " ".repeat(width.saturating_sub(cell.chars().count()));
        let text = match paint(cell) {
            Some(painted) if colorize => painted.to_string(),
            _ => cell.to_string(),
        };
        line.push_str(&format!(" {text}{padding} |"));
    }
    line.push('\n');
    line
}

/// Color for a status word, `None` for ordinary text.
fn paint(cell: &str) -> Option<ColoredString> {
    match cell {
        "Missing" | "None" | "Invalid" | "N/A" | "Failed" => Some(cell.red()),
        "New" | "Changed" | "Updated" => Some(cell.blue()),
        "OK" => Some(cell.green()),
        "Dirty" => Some(cell.yellow()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_render_check_table() {
        let table = render(
            &["folder", "ref", "position", "status"],
            &rows(&[&["alpha", "main", "main", "OK"], &["beta", "v1.0", "None", "Missing"]]),
            false,
        );

        insta::assert_snapshot!(table.trim_end(), @r"
        +--------+------+----------+---------+
        | folder | ref  | position | status  |
        +--------+------+----------+---------+
        | alpha  | main | main     | OK      |
        | beta   | v1.0 | None     | Missing |
        +--------+------+----------+---------+
        ");
    }

    #[test]
    fn test_render_without_rows_keeps_header() {
        let table = render(&["url", "ref"], &[], false);

        assert_eq!(table, "+-----+-----+\n| url | ref |\n+-----+-----+\n+-----+-----+\n");
    }

    #[test]
    fn test_colorize_pads_outside_escape_codes() {
        colored::control::set_override(true);
        let table = render(&["folder", "status"], &rows(&[&["alpha", "OK"]]), true);
        let row = table.lines().nth(3).unwrap();

        assert!(row.contains('\u{1b}'), "expected escape codes in {row:?}");
        assert!(row.ends_with(&format!("{}     |", "OK".green())), "got {row:?}");
    }

    #[test]
    fn test_width_counts_characters() {
        let table = render(&["folder"], &rows(&[&["café"]]), false);

        assert_eq!(table.lines().nth(3), Some("| café   |"));
    }

    proptest! {
        #[test]
        fn test_lines_align(
            data in prop::collection::vec(
                prop::collection::vec("[a-zA-Z0-9 ./-]{0,12}", 3),
                0..6,
            )
        ) {
            let table = render(&["folder", "ref", "status"], &data, false);
            let lengths: Vec<usize> = table.lines().map(|l| l.chars().count()).collect();

            prop_assert_eq!(lengths.len(), data.len() + 4);
            prop_assert!(lengths.windows(2).all(|w| w[0] == w[1]));
            for line in table.lines() {
                prop_assert!(line.starts_with('|') || line.starts_with('+'));
                prop_assert!(line.ends_with('|') || line.ends_with('+'));
            }
        }
    }
}
