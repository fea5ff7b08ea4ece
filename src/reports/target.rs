use crate::columns::canonicalize;
use crate::insight::extract_insight;
use crate::loader::TableSource;
use crate::normalize::{display, format_money};
use crate::types::{sheets, CanonicalRecord, Field, RawTable, TableContext};

/// Column-name fragments that mark a money column in the target sheet.
pub const NUMERIC_HINTS: [&str; 5] = ["amount", "target", "sales", "moonshot", "fulfillment"];

pub fn is_numeric_column(name: &str) -> bool {
    let lower = name.to_lowercase();
    NUMERIC_HINTS.iter().any(|k| lower.contains(k))
}

pub fn build_target(source: &dyn TableSource) -> TableContext {
    target_from_table(&source.load(sheets::ECOM_TARGET))
}

pub fn target_from_table(raw: &RawTable) -> TableContext {
    let mut ctx = TableContext {
        title: "E-commerce Performance".to_string(),
        description: "2026 target plan across the funnel.".to_string(),
        ..Default::default()
    };
    if raw.is_empty() {
        return ctx;
    }

    // No renames here, only whitespace cleanup of the headers.
    let table = canonicalize(raw, &[]);
    ctx.insight = extract_insight(&table);
    ctx.rows = table
        .rows
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .map(|c| {
                    let cell = table.get(row, c);
                    let value = if is_numeric_column(c) {
                        format_money(cell, 2)
                    } else {
                        display(cell)
                    };
                    (c.clone(), Field::Text(value))
                })
                .collect::<CanonicalRecord>()
        })
        .collect();
    ctx.columns = table.columns;
    ctx
}
