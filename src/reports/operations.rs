use crate::columns::{canonicalize, lookup};
use crate::loader::TableSource;
use crate::normalize::display;
use crate::types::{group_push, sheets, CanonicalRecord, Field, Grouped, RawRecord, RawTable};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperationsContext {
    pub title: String,
    pub grouped_ops: Grouped<CanonicalRecord>,
    pub insights: Vec<CanonicalRecord>,
    pub status_counter: IndexMap<String, usize>,
}

pub fn build_operations(source: &dyn TableSource) -> OperationsContext {
    operations_from_table(&source.load(sheets::OPERATION_HEALTH))
}

/// Rows with `Funnel Stage == insight` are commentary; everything else is
/// grouped by stage and tallied by status.
pub fn operations_from_table(raw: &RawTable) -> OperationsContext {
    let table = canonicalize(raw, &[]);
    let mut ctx = OperationsContext { title: "Operations Health".to_string(), ..Default::default() };
    for row in &table.rows {
        let stage = lookup(row, &["Funnel Stage"]);
        let status = lookup(row, &["Status"]);
        let record = to_record(&table, row);
        if stage.eq_ignore_ascii_case("insight") {
            ctx.insights.push(record);
            continue;
        }
        let stage = if stage.is_empty() { "Unassigned".to_string() } else { stage };
        group_push(&mut ctx.grouped_ops, stage, record);
        if !status.is_empty() {
            *ctx.status_counter.entry(status).or_default() += 1;
        }
    }
    ctx
}

fn to_record(table: &RawTable, row: &RawRecord) -> CanonicalRecord {
    table
        .columns
        .iter()
        .map(|c| (c.clone(), Field::Text(display(table.get(row, c)))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_insights_and_counts_status() {
        let raw = RawTable::from_rows(
            ["Funnel Stage", "Status", "Note"],
            vec![
                vec!["Checkout", "Green", "ok"],
                vec!["Insight", "", "Returns spike in Q3"],
                vec!["", "Red", "unowned"],
                vec!["Checkout", "Red", "latency"],
            ],
        );
        let ctx = operations_from_table(&raw);
        assert_eq!(ctx.insights.len(), 1);
        assert_eq!(ctx.insights[0]["Note"].as_str(), "Returns spike in Q3");
        let stages: Vec<&str> = ctx.grouped_ops.keys().map(String::as_str).collect();
        assert_eq!(stages, vec!["Checkout", "Unassigned"]);
        assert_eq!(ctx.status_counter["Red"], 2);
        assert_eq!(ctx.status_counter["Green"], 1);
    }
}
