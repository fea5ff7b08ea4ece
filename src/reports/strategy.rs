use crate::columns::{canonicalize, ensure_columns};
use crate::loader::TableSource;
use crate::normalize::display;
use crate::types::{group_push, sheets, Grouped, RawTable};
use serde::Serialize;

pub const DEFAULT_GOAL: &str = "2026 Strategy Plan";
pub const DEFAULT_PILLAR: &str = "General";

const REQUIRED: [&str; 8] = [
    "Goal",
    "Strategy Pillar",
    "Phase",
    "Quarter",
    "Action",
    "Photo_URL 1",
    "Photo_URL 2",
    "Photo_URL 3",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyEntry {
    pub goal: String,
    pub phase: String,
    pub quarter: String,
    pub action: String,
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyContext {
    pub title: String,
    pub goal_text: String,
    pub pillars: Grouped<StrategyEntry>,
}

pub fn build_strategy(source: &dyn TableSource) -> StrategyContext {
    strategy_from_table(&source.load(sheets::STRATEGY_PLAN))
}

pub fn strategy_from_table(raw: &RawTable) -> StrategyContext {
    let mut ctx = StrategyContext {
        title: DEFAULT_GOAL.to_string(),
        goal_text: DEFAULT_GOAL.to_string(),
        pillars: Grouped::new(),
    };
    if raw.is_empty() {
        return ctx;
    }

    let mut table = canonicalize(raw, &[]);
    ensure_columns(&mut table, &REQUIRED);

    // The goal is only written on the first row of each block.
    let mut current_goal = String::new();
    for row in &table.rows {
        let goal = display(table.get(row, "Goal"));
        if !goal.is_empty() {
            current_goal = goal;
        }
        let mut pillar = display(table.get(row, "Strategy Pillar"));
        if pillar.is_empty() {
            pillar = DEFAULT_PILLAR.to_string();
        }
        let photos = ["Photo_URL 1", "Photo_URL 2", "Photo_URL 3"]
            .iter()
            .map(|c| display(table.get(row, c)))
            .filter(|url| !url.is_empty())
            .collect();
        group_push(
            &mut ctx.pillars,
            pillar,
            StrategyEntry {
                goal: current_goal.clone(),
                phase: display(table.get(row, "Phase")),
                quarter: display(table.get(row, "Quarter")),
                action: display(table.get(row, "Action")),
                photos,
            },
        );
    }
    if !current_goal.is_empty() {
        ctx.goal_text = current_goal;
    }
    ctx
}
