// Report builders.
//
// Each builder loads its sheet(s) fresh from a `TableSource`, cleans the
// rows and computes its aggregates. Builders never fail: a missing sheet
// produces an empty but complete context.

pub mod bob;
pub mod comparison;
pub mod cost_per_x;
pub mod dashboard;
pub mod fna;
pub mod okr;
pub mod operations;
pub mod roadmap;
pub mod strategy;
pub mod swot;
pub mod target;

use crate::loader::TableSource;
use crate::types::{AggregationPolicy, ReportKind, TableContext};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "report", content = "context", rename_all = "snake_case")]
pub enum ReportContext {
    Dashboard(dashboard::DashboardContext),
    Table(TableContext),
    Bob(bob::BobContext),
    Strategy(strategy::StrategyContext),
    Roadmap(roadmap::RoadmapContext),
    Swot(swot::SwotContext),
    Okr(okr::OkrContext),
    Fna(fna::FnaContext),
    Operations(operations::OperationsContext),
}

impl ReportContext {
    /// The tabular part of the context, for reports that have one.
    pub fn table(&self) -> Option<&TableContext> {
        match self {
            ReportContext::Table(t) => Some(t),
            ReportContext::Bob(b) => Some(&b.table),
            _ => None,
        }
    }
}

pub fn build_report(kind: ReportKind, source: &dyn TableSource) -> ReportContext {
    info!(report = kind.slug(), "building report");
    match kind {
        ReportKind::Dashboard => ReportContext::Dashboard(dashboard::build_dashboard(source)),
        ReportKind::Target => ReportContext::Table(target::build_target(source)),
        ReportKind::Comparison => ReportContext::Table(comparison::build_comparison(
            source,
            AggregationPolicy::Unconditional,
        )),
        ReportKind::ComparisonSnapshot => ReportContext::Table(comparison::build_comparison(
            source,
            AggregationPolicy::BothNonzero,
        )),
        ReportKind::StrategyPlan => ReportContext::Strategy(strategy::build_strategy(source)),
        ReportKind::Roadmap => ReportContext::Roadmap(roadmap::build_roadmap(source)),
        ReportKind::Swot => ReportContext::Swot(swot::build_swot(source)),
        ReportKind::CostPerX => ReportContext::Table(cost_per_x::build_cost_per_x(source)),
        ReportKind::Okr => ReportContext::Okr(okr::build_okr(source)),
        ReportKind::Fna => ReportContext::Fna(fna::build_fna(source)),
        ReportKind::OperationHealth => {
            ReportContext::Operations(operations::build_operations(source))
        }
        ReportKind::Bob => ReportContext::Bob(bob::build_bob(source)),
    }
}
