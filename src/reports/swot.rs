use crate::columns::{lookup, lookup_non_empty};
use crate::loader::TableSource;
use crate::types::{group_push, sheets, Grouped, RawTable};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwotPoint {
    pub id: String,
    pub title: String,
    pub details_2025: String,
    pub details_2026: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyInsight {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SwotContext {
    pub sections: Grouped<SwotPoint>,
    pub key_insights: Vec<KeyInsight>,
}

pub fn build_swot(source: &dyn TableSource) -> SwotContext {
    swot_from_table(&source.load(sheets::SWOT))
}

pub fn swot_from_table(raw: &RawTable) -> SwotContext {
    let mut ctx = SwotContext::default();
    for row in &raw.rows {
        let category = lookup(row, &["Category"]);
        if category.is_empty() {
            continue;
        }
        let point_id = lookup(row, &["Point_ID"]);
        let title = lookup_non_empty(row, &["Key_Item", "Key Item"]);
        let details_2025 = lookup_non_empty(row, &["2025", "2025 Insight"]);
        let details_2026 = lookup_non_empty(row, &["2026", "2026 Strategy"]);

        if category.eq_ignore_ascii_case("key insight") {
            let content = [details_2025, details_2026, point_id]
                .into_iter()
                .find(|s| !s.is_empty())
                .unwrap_or_default();
            ctx.key_insights.push(KeyInsight { title, content });
            continue;
        }
        group_push(
            &mut ctx.sections,
            category,
            SwotPoint { id: point_id, title, details_2025, details_2026 },
        );
    }
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_in_first_seen_order() {
        let raw = RawTable::from_rows(
            ["Category", "Point_ID", "Key Item", "2025 Insight", "2026"],
            vec![
                vec!["Weakness", "W1", "Slow ops", "Late deliveries", "Automate"],
                vec!["Strength", "S1", "Brand", "Loved", ""],
                vec!["", "X", "skip me", "", ""],
                vec!["Key Insight", "K1", "Focus", "", "Double down on CRM"],
                vec!["Weakness", "W2", "Cost", "High CPA", ""],
            ],
        );
        let ctx = swot_from_table(&raw);
        let keys: Vec<&str> = ctx.sections.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Weakness", "Strength"]);
        assert_eq!(ctx.sections["Weakness"].len(), 2);
        assert_eq!(ctx.sections["Weakness"][0].details_2026, "Automate");
        assert_eq!(ctx.key_insights.len(), 1);
        assert_eq!(ctx.key_insights[0].content, "Double down on CRM");
    }
}
