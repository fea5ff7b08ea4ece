// Entry point and high-level CLI flow.
//
// - With a report slug as the first argument, builds that one report,
//   exports it and exits.
// - Otherwise shows a numbered menu. Every selection re-reads the workbook,
//   so edits to the sheet show up without restarting.
// - After a report is generated the user can go back to the menu or exit.
use std::io::{self, Write};
use std::process::ExitCode;
use strategy_dashboard::config::Config;
use strategy_dashboard::loader::TableSource;
use strategy_dashboard::output;
use strategy_dashboard::reports::{build_report, ReportContext};
use strategy_dashboard::types::ReportKind;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

const PREVIEW_ROWS: usize = 5;

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    // EOF exits like "0"
    if io::stdin().read_line(&mut buf).unwrap_or(0) == 0 {
        return "0".to_string();
    }
    buf.trim().to_string()
}

/// Ask whether to go back to the report menu. `true` for `Y`, `false` for `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        if io::stdin().read_line(&mut buf).unwrap_or(0) == 0 {
            return false;
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Build one report from a fresh load, print a preview and export it.
fn handle_report(kind: ReportKind, config: &Config, source: &dyn TableSource) -> bool {
    let context = build_report(kind, source);
    println!("{}\n", kind.title());
    print_summary(&context);

    match output::export_report(&config.output_dir, kind, &context) {
        Ok(paths) => {
            for p in paths {
                println!("(Exported to {})", p.display());
            }
            println!();
            true
        }
        Err(e) => {
            error!(report = kind.slug(), error = %e, "export failed");
            eprintln!("Write error: {}\n", e);
            false
        }
    }
}

fn print_summary(context: &ReportContext) {
    if let Some(table) = context.table() {
        print!("{}", output::preview_table(table, PREVIEW_ROWS));
        for (name, value) in &table.aggregates {
            let v = value.as_str();
            if !v.is_empty() {
                println!("{}: {}", name, v);
            }
        }
        if !table.insight.is_empty() {
            println!("Insight: {}", table.insight);
        }
        println!();
        return;
    }
    match context {
        ReportContext::Dashboard(d) => {
            for card in &d.cards {
                println!("{}", card.title);
                for row in &card.rows {
                    println!("  {}: {}", row.label, row.value);
                }
            }
        }
        ReportContext::Strategy(s) => {
            println!("Goal: {}", s.goal_text);
            for (pillar, entries) in &s.pillars {
                println!("  {} ({} actions)", pillar, entries.len());
            }
        }
        ReportContext::Roadmap(r) => {
            for q in &r.quarter_order {
                println!("  {} ({} activities)", q, r.quarters[q].len());
            }
        }
        ReportContext::Swot(s) => {
            for (category, points) in &s.sections {
                println!("  {} ({} points)", category, points.len());
            }
            println!("  Key insights: {}", s.key_insights.len());
        }
        ReportContext::Okr(o) => {
            for team in &o.comparison {
                println!(
                    "  {}: 2025 avg {} / 2026 avg {}",
                    team.team,
                    fmt_avg(team.avg_2025),
                    fmt_avg(team.avg_2026)
                );
            }
        }
        ReportContext::Fna(f) => {
            for (category, meta) in &f.category_meta {
                println!("  {} ({} KPIs)", category, meta.count);
            }
        }
        ReportContext::Operations(o) => {
            for (stage, ops) in &o.grouped_ops {
                println!("  {} ({} items)", stage, ops.len());
            }
            println!("  Insights: {}", o.insights.len());
        }
        ReportContext::Table(_) | ReportContext::Bob(_) => {}
    }
    println!();
}

fn fmt_avg(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |n| format!("{:.1}%", n))
}

fn print_menu() {
    println!("Select Report:");
    for (i, kind) in ReportKind::ALL.iter().enumerate() {
        println!("[{}] {}", i + 1, kind.title());
    }
    println!("[0] Exit\n");
}

fn main() -> ExitCode {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).with_writer(io::stderr).init();

    let config = Config::from_env();
    info!(workbook = %config.workbook.display(), output = %config.output_dir.display(), "startup");
    let source = config.source();

    if let Some(slug) = std::env::args().nth(1) {
        let Some(kind) = ReportKind::from_slug(&slug) else {
            eprintln!("Unknown report '{}'. Available:", slug);
            for k in ReportKind::ALL {
                eprintln!("  {}", k.slug());
            }
            return ExitCode::from(2);
        };
        return if handle_report(kind, &config, source.as_ref()) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    loop {
        print_menu();
        let choice = read_choice();
        if choice == "0" {
            println!("Exiting the program.");
            break;
        }
        let selected = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| ReportKind::ALL.get(i).copied());
        let Some(kind) = selected else {
            println!("Invalid choice. Please enter 0-{}.\n", ReportKind::ALL.len());
            continue;
        };
        println!();
        handle_report(kind, &config, source.as_ref());
        if !prompt_back_to_menu() {
            println!("Exiting the program.");
            break;
        }
    }
    ExitCode::SUCCESS
}
