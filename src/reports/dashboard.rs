use super::comparison::build_comparison;
use super::roadmap::{build_roadmap, RoadmapContext};
use super::strategy::{build_strategy, StrategyContext};
use super::target::build_target;
use crate::loader::TableSource;
use crate::normalize::{format_money, parse_number};
use crate::types::{AggregationPolicy, Cell, TableContext};
use serde::Serialize;

/// Rows shown per summary card.
pub const CARD_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub title: String,
    pub rows: Vec<CardRow>,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardContext {
    pub title: String,
    pub cards: Vec<Card>,
    pub strategy: StrategyContext,
    pub roadmap: RoadmapContext,
}

pub fn build_dashboard(source: &dyn TableSource) -> DashboardContext {
    let target = build_target(source);
    let comparison = build_comparison(source, AggregationPolicy::Unconditional);
    DashboardContext {
        title: "Strategy Dashboard".to_string(),
        cards: vec![
            Card {
                title: "2026 Target Plan".to_string(),
                rows: target_rows(&target),
                link: "/ecom".to_string(),
            },
            Card {
                title: "2024 vs 2025 Performance".to_string(),
                rows: comparison_rows(&comparison),
                link: "/ecom_comp".to_string(),
            },
        ],
        strategy: build_strategy(source),
        roadmap: build_roadmap(source),
    }
}

/// Label from the first column, value from the first non-empty column after it.
pub fn target_rows(target: &TableContext) -> Vec<CardRow> {
    let Some((first, rest)) = target.columns.split_first() else {
        return Vec::new();
    };
    target
        .rows
        .iter()
        .take(CARD_ROWS)
        .map(|row| {
            let label = row.get(first).map(|f| f.as_str().to_string()).unwrap_or_default();
            let value = rest
                .iter()
                .filter_map(|c| row.get(c))
                .map(|f| f.as_str())
                .find(|v| !v.is_empty())
                .map(|v| match parse_number(&Cell::text(v)) {
                    Some(_) => format_money(&Cell::text(v), 2),
                    None => v.to_string(),
                })
                .unwrap_or_default();
            CardRow { label, value }
        })
        .collect()
}

pub fn comparison_rows(comparison: &TableContext) -> Vec<CardRow> {
    comparison
        .rows
        .iter()
        .take(CARD_ROWS)
        .map(|row| {
            let get = |k: &str| row.get(k).map(|f| f.as_str()).unwrap_or("");
            CardRow {
                label: get("Months").to_string(),
                value: format!("{} → {}", get("2024_fmt"), get("2025_fmt")),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemorySource;
    use crate::types::{sheets, RawTable};

    #[test]
    fn cards_summarise_target_and_comparison() {
        let source = MemorySource::new()
            .with_sheet(
                sheets::ECOM_TARGET,
                RawTable::from_rows(
                    ["Channel", "Notes", "Sales Target"],
                    vec![vec![Cell::from("Web"), Cell::Blank, Cell::from(1500.0)]],
                ),
            )
            .with_sheet(
                sheets::ECOM_COMPARISON,
                RawTable::from_rows(
                    ["Months", "2024", "2025"],
                    vec![vec![Cell::from("Jan"), Cell::from(1000.0), Cell::from(1200.0)]],
                ),
            );
        let ctx = build_dashboard(&source);
        assert_eq!(ctx.cards[0].rows[0], CardRow { label: "Web".into(), value: "1,500.00".into() });
        assert_eq!(ctx.cards[1].rows[0], CardRow { label: "Jan".into(), value: "1,000 → 1,200".into() });
    }

    #[test]
    fn empty_source_still_renders() {
        let ctx = build_dashboard(&MemorySource::new());
        assert!(ctx.cards.iter().all(|c| c.rows.is_empty()));
        assert!(ctx.strategy.pillars.is_empty());
        assert!(ctx.roadmap.quarter_order.is_empty());
    }
}
