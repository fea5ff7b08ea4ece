// End-to-end report builds through the public table sources.

use std::fs;
use strategy_dashboard::loader::{CsvDirSource, MemorySource, TableSource, WorkbookSource};
use strategy_dashboard::reports::{build_report, ReportContext};
use strategy_dashboard::types::{sheets, Cell, RawTable, ReportKind};

fn write_sheet(dir: &std::path::Path, sheet: &str, body: &str) {
    fs::write(dir.join(format!("{}.csv", sheet)), body).unwrap();
}

#[test]
fn every_report_survives_an_empty_source() {
    let source = MemorySource::new();
    for kind in ReportKind::ALL {
        let ctx = build_report(kind, &source);
        if let Some(table) = ctx.table() {
            assert!(table.rows.is_empty(), "{} should have no rows", kind.slug());
        }
        // Every context must still serialise for the presentation layer.
        serde_json::to_string(&ctx).unwrap();
    }
}

#[test]
fn every_report_survives_a_missing_workbook() {
    let source = WorkbookSource::new("/no/such/strategic_insight.xlsx");
    for kind in ReportKind::ALL {
        let ctx = build_report(kind, &source);
        serde_json::to_string(&ctx).unwrap();
    }
    let ReportContext::Table(comp) = build_report(ReportKind::Comparison, &source) else {
        panic!("comparison is a table report");
    };
    assert_eq!(comp.aggregate("total_2024"), "0");
    assert_eq!(comp.aggregate("max_month"), "-");
}

#[test]
fn comparison_from_csv_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_sheet(
        dir.path(),
        sheets::ECOM_COMPARISON,
        "Months,2024,2025\nJan,\"1,000\",\"1,500\"\nFeb,,800\nDec,2000,0\n",
    );
    let source = CsvDirSource::new(dir.path());

    let ReportContext::Table(live) = build_report(ReportKind::Comparison, &source) else {
        panic!("expected table");
    };
    assert_eq!(live.rows.len(), 3);
    assert_eq!(live.aggregate("total_2024"), "3,000");
    assert_eq!(live.aggregate("total_2025"), "2,300");
    assert_eq!(live.aggregate("avg_2025"), "767");
    assert_eq!(live.aggregate("max_month"), "Jan");
    assert_eq!(live.aggregate("min_month"), "Feb");

    let ReportContext::Table(snapshot) = build_report(ReportKind::ComparisonSnapshot, &source)
    else {
        panic!("expected table");
    };
    assert_eq!(snapshot.aggregate("total_2024"), "1,000");
    assert_eq!(snapshot.aggregate("total_2025"), "1,500");
    assert_eq!(snapshot.aggregate("avg_2025"), "1,500");
}

#[test]
fn target_from_csv_directory_with_insight() {
    let dir = tempfile::tempdir().unwrap();
    write_sheet(
        dir.path(),
        sheets::ECOM_TARGET,
        "Funnel,Sales Amount,Owner\n\
         Traffic,\"12,500\",Ann\n\
         Conversion,nan,\n\
         Insight,Focus on repeat buyers,\n",
    );
    let source = CsvDirSource::new(dir.path());
    let ReportContext::Table(ctx) = build_report(ReportKind::Target, &source) else {
        panic!("expected table");
    };
    assert_eq!(ctx.insight, "Focus on repeat buyers");
    assert_eq!(ctx.rows[0]["Sales Amount"].as_str(), "12,500.00");
    assert_eq!(ctx.rows[1]["Sales Amount"].as_str(), "");
    assert_eq!(ctx.rows[1]["Owner"].as_str(), "");
}

#[test]
fn csv_source_loads_fresh_on_every_call() {
    let dir = tempfile::tempdir().unwrap();
    let source = CsvDirSource::new(dir.path());
    assert!(source.load(sheets::ROADMAP).is_empty());

    write_sheet(dir.path(), sheets::ROADMAP, "Quarter,Activity_ID,Key Topic,Owner\nQ2,R-1,Launch,Kim\n");
    assert_eq!(source.load(sheets::ROADMAP).len(), 1);

    write_sheet(
        dir.path(),
        sheets::ROADMAP,
        "Quarter,Activity_ID,Key Topic,Owner\nQ2,R-1,Launch,Kim\nQ1,R-2,Plan,Lee\n",
    );
    let ReportContext::Roadmap(ctx) = build_report(ReportKind::Roadmap, &source) else {
        panic!("expected roadmap");
    };
    assert_eq!(ctx.quarter_order, vec!["Q1", "Q2"]);
}

#[test]
fn strategy_pillars_keep_first_seen_order() {
    let table = RawTable::from_rows(
        ["Goal", "Strategy Pillar", "Action"],
        vec![
            vec![Cell::from("Win"), Cell::from("B"), Cell::from("1")],
            vec![Cell::Blank, Cell::from("A"), Cell::from("2")],
            vec![Cell::Blank, Cell::from("B"), Cell::from("3")],
            vec![Cell::Blank, Cell::from("C"), Cell::from("4")],
        ],
    );
    let source = MemorySource::new().with_sheet(sheets::STRATEGY_PLAN, table);
    let ReportContext::Strategy(ctx) = build_report(ReportKind::StrategyPlan, &source) else {
        panic!("expected strategy");
    };
    let keys: Vec<&str> = ctx.pillars.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["B", "A", "C"]);
}

#[test]
fn bob_report_from_variant_headers() {
    let orders = RawTable::from_rows(
        ["boborder", "Months", "Self Order", "Grand Total", "cs percentage"],
        vec![
            vec![Cell::from(10.0), Cell::from("Jan"), Cell::from(5.0), Cell::from(15.0), Cell::from(0.5)],
            vec![Cell::from(30.0), Cell::from("Feb"), Cell::from(10.0), Cell::from(40.0), Cell::Blank],
        ],
    );
    let source = MemorySource::new().with_sheet(sheets::BOB, orders);
    let ReportContext::Bob(ctx) = build_report(ReportKind::Bob, &source) else {
        panic!("expected bob");
    };
    assert_eq!(ctx.table.aggregate("total_bob"), "40");
    assert_eq!(ctx.table.aggregate("best_month"), "Feb");
    assert_eq!(ctx.table.aggregate("avg_cs"), "50.0%");
    assert!(ctx.reviews.is_empty());
}
