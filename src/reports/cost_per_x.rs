use crate::columns::{canonicalize, ensure_columns, COST_PER_X_RULES};
use crate::loader::TableSource;
use crate::normalize::display;
use crate::types::{sheets, CanonicalRecord, Field, RawTable, TableContext};

pub const COLUMNS: [&str; 4] = ["Cost per X", "Facts", "Why?", "What to Improve More?"];

pub fn build_cost_per_x(source: &dyn TableSource) -> TableContext {
    cost_per_x_from_table(&source.load(sheets::COST_PER_X))
}

pub fn cost_per_x_from_table(raw: &RawTable) -> TableContext {
    let mut ctx = TableContext {
        title: "Cost per X".to_string(),
        columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
        ..Default::default()
    };
    if raw.is_empty() {
        return ctx;
    }

    let mut table = canonicalize(raw, COST_PER_X_RULES);
    ensure_columns(&mut table, &COLUMNS);
    ctx.rows = table
        .rows
        .iter()
        .map(|row| {
            COLUMNS
                .iter()
                .map(|c| {
                    let value = display(table.get(row, c)).replace("\r\n", "\n").replace('\r', "\n");
                    (c.to_string(), Field::Text(value))
                })
                .collect::<CanonicalRecord>()
        })
        .collect();
    ctx
}
