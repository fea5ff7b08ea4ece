// Free-text "insight" row detection.
//
// Some sheets carry a commentary row mixed in with the data. It is found
// either by an explicit label in the first column or, failing that, by
// looking for the last row that reads like prose.

use crate::normalize::display;
use crate::types::{RawRecord, RawTable};
use once_cell::sync::Lazy;
use regex::Regex;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{3,}").unwrap());

/// Minimum length (in characters) for a row to count as prose.
pub const PROSE_MIN_CHARS: usize = 40;

/// First-column label marking an insight row.
pub fn is_insight_label(label: &str) -> bool {
    label.trim().to_lowercase().contains("insight")
}

/// Long text without any run of three or more digits.
pub fn looks_like_prose(text: &str) -> bool {
    text.chars().count() > PROSE_MIN_CHARS && !DIGIT_RUN.is_match(text)
}

/// Space-joined display values of the given columns, skipping blanks.
pub fn joined_values<'a>(row: &RawRecord, columns: impl IntoIterator<Item = &'a String>) -> String {
    columns
        .into_iter()
        .filter_map(|c| row.get(c))
        .map(display)
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Insight text for a table, or an empty string when no row qualifies.
pub fn extract_insight(table: &RawTable) -> String {
    let Some(first_col) = table.columns.first() else {
        return String::new();
    };
    let labelled = table
        .rows
        .iter()
        .find(|row| row.get(first_col).map(display).is_some_and(|v| is_insight_label(&v)));
    if let Some(row) = labelled {
        return joined_values(row, table.columns.iter().skip(1)).trim().to_string();
    }
    table
        .rows
        .iter()
        .rev()
        .map(|row| joined_values(row, &table.columns))
        .find(|joined| looks_like_prose(joined))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    #[test]
    fn labelled_row_wins() {
        let t = RawTable::from_rows(
            ["Metric", "Q1", "Q2"],
            vec![
                vec![Cell::from("Sales"), Cell::from(1000.0), Cell::from(2000.0)],
                vec![Cell::from("Key Insight"), Cell::from("Growth came from"), Cell::from("nan")],
                vec![Cell::from("Note"), Cell::from("trailing"), Cell::from("text")],
            ],
        );
        assert_eq!(extract_insight(&t), "Growth came from");
    }

    #[test]
    fn falls_back_to_last_prose_row() {
        let t = RawTable::from_rows(
            ["Metric", "Value"],
            vec![
                vec![
                    Cell::from("Summary"),
                    Cell::from("Customers responded well to the bundle offers"),
                ],
                vec![Cell::from("Orders"), Cell::from(15750.0)],
            ],
        );
        assert_eq!(
            extract_insight(&t),
            "Summary Customers responded well to the bundle offers"
        );
    }

    #[test]
    fn digits_disqualify_prose() {
        assert!(!looks_like_prose("Revenue reached 15750 in the month of January 2025"));
        assert!(looks_like_prose("Revenue reached a new high in the month of January"));
        assert!(!looks_like_prose("short"));
    }

    #[test]
    fn nothing_found_is_empty() {
        let t = RawTable::from_rows(["A"], vec![vec!["x"]]);
        assert_eq!(extract_insight(&t), "");
        assert_eq!(extract_insight(&RawTable::empty()), "");
    }
}
