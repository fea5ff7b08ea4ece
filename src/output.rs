use crate::reports::ReportContext;
use crate::types::{CanonicalRecord, Field, ReportKind, TableContext};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style};

/// What gets written to `<slug>.json`.
#[derive(Debug, Serialize)]
pub struct ReportEnvelope<'a> {
    pub title: &'static str,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub context: &'a ReportContext,
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Export the cleaned rows of a tabular report, columns in context order.
pub fn write_csv(path: &Path, table: &TableContext) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(table.columns.iter().map(|c| cell_text(row, c)))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the JSON envelope (and a CSV for tabular reports) into `dir`.
/// Returns the paths written.
pub fn export_report(
    dir: &Path,
    kind: ReportKind,
    context: &ReportContext,
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let json_path = dir.join(format!("{}.json", kind.slug()));
    let envelope = ReportEnvelope { title: kind.title(), generated_at: Utc::now(), context };
    write_json(&json_path, &envelope)?;
    written.push(json_path);

    if let Some(table) = context.table() {
        let csv_path = dir.join(format!("{}.csv", kind.slug()));
        write_csv(&csv_path, table)?;
        written.push(csv_path);
    }
    Ok(written)
}

fn cell_text(row: &CanonicalRecord, column: &str) -> String {
    match row.get(column) {
        Some(Field::Text(s)) => s.clone(),
        Some(Field::Number(Some(n))) => n.to_string(),
        _ => String::new(),
    }
}

/// Markdown preview of the first `max_rows` rows.
pub fn preview_table(table: &TableContext, max_rows: usize) -> String {
    if table.rows.is_empty() {
        return "(no rows)\n".to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(table.columns.iter().cloned());
    for row in table.rows.iter().take(max_rows) {
        builder.push_record(table.columns.iter().map(|c| cell_text(row, c)));
    }
    let mut rendered = builder.build();
    rendered.with(Style::markdown());
    format!("{}\n", rendered)
}
