use crate::columns::lookup;
use crate::loader::TableSource;
use crate::types::{group_push, sheets, Grouped, RawTable};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapEntry {
    #[serde(rename = "Activity_ID")]
    pub activity_id: String,
    #[serde(rename = "Topic")]
    pub topic: String,
    #[serde(rename = "Owner")]
    pub owner: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoadmapContext {
    pub quarters: Grouped<RoadmapEntry>,
    /// Quarter labels sorted lexicographically ("Q1 2026" < "Q2 2026").
    pub quarter_order: Vec<String>,
}

pub fn build_roadmap(source: &dyn TableSource) -> RoadmapContext {
    roadmap_from_table(&source.load(sheets::ROADMAP))
}

pub fn roadmap_from_table(raw: &RawTable) -> RoadmapContext {
    let mut ctx = RoadmapContext::default();
    for row in &raw.rows {
        let mut quarter = lookup(row, &["Quarter"]);
        if quarter.is_empty() {
            quarter = "Unassigned".to_string();
        }
        group_push(
            &mut ctx.quarters,
            quarter,
            RoadmapEntry {
                activity_id: lookup(row, &["Activity_ID", "Activity ID"]),
                topic: lookup(row, &["Key Topic", "Key_Topic", "Key Activity"]),
                owner: lookup(row, &["Owner"]),
            },
        );
    }
    ctx.quarter_order = ctx.quarters.keys().cloned().collect();
    ctx.quarter_order.sort();
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarters_sorted_for_listing() {
        let raw = RawTable::from_rows(
            ["quarter ", "Activity ID", "Key Activity", "OWNER"],
            vec![
                vec!["Q3", "A-3", "Launch", "Kim"],
                vec!["Q1", "A-1", "Plan", "Lee"],
                vec!["", "A-9", "Backlog", ""],
                vec!["Q3", "A-4", "Review", "Kim"],
            ],
        );
        let ctx = roadmap_from_table(&raw);
        let first_seen: Vec<&str> = ctx.quarters.keys().map(String::as_str).collect();
        assert_eq!(first_seen, vec!["Q3", "Q1", "Unassigned"]);
        assert_eq!(ctx.quarter_order, vec!["Q1", "Q3", "Unassigned"]);
        assert_eq!(ctx.quarters["Q3"][1].activity_id, "A-4");
        assert_eq!(ctx.quarters["Q1"][0].topic, "Plan");
        assert_eq!(ctx.quarters["Q1"][0].owner, "Lee");
    }

    #[test]
    fn empty_sheet() {
        let ctx = roadmap_from_table(&RawTable::empty());
        assert!(ctx.quarters.is_empty());
        assert!(ctx.quarter_order.is_empty());
    }
}
