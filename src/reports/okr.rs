use crate::columns::{find_column, lookup};
use crate::loader::TableSource;
use crate::normalize::display;
use crate::types::{sheets, CanonicalRecord, Cell, Field, RawRecord, RawTable};
use indexmap::IndexMap;
use serde::Serialize;

pub const DEFAULT_TEAM: &str = "Other";
pub const DEFAULT_OBJECTIVE: &str = "No Objective";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectiveComparison {
    pub objective: String,
    pub items_2025: Vec<CanonicalRecord>,
    pub items_2026: Vec<CanonicalRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamComparison {
    pub team: String,
    pub objectives: Vec<ObjectiveComparison>,
    pub avg_2025: Option<f64>,
    pub avg_2026: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OkrContext {
    pub title: String,
    pub comparison: Vec<TeamComparison>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Year {
    Y2025,
    Y2026,
}

fn year_of(row: &RawRecord) -> Option<Year> {
    let years = lookup(row, &["Years"]);
    if years.contains("2025") {
        Some(Year::Y2025)
    } else if years.contains("2026") {
        Some(Year::Y2026)
    } else {
        None
    }
}

/// Score as a percentage: `"%"` is dropped and values with magnitude <= 1
/// are read as proportions. `None` for blank or non-numeric cells.
pub fn score_percent(raw: &Cell) -> Option<f64> {
    let value = match raw {
        Cell::Number(n) if n.is_finite() => *n,
        Cell::Text(s) => s.replace('%', "").trim().parse::<f64>().ok().filter(|n| n.is_finite())?,
        _ => return None,
    };
    Some(if value.abs() <= 1.0 { value * 100.0 } else { value })
}

/// Mean score rounded to one decimal; blanks are skipped rather than
/// counted as zero.
pub fn average_score<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Option<f64> {
    let values: Vec<f64> = cells.into_iter().filter_map(score_percent).collect();
    if values.is_empty() {
        return None;
    }
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    Some((avg * 10.0).round() / 10.0)
}

pub fn build_okr(source: &dyn TableSource) -> OkrContext {
    okr_from_table(&source.load(sheets::OKR))
}

pub fn okr_from_table(raw: &RawTable) -> OkrContext {
    // team -> (2025 rows, 2026 rows), teams in first-seen order
    let mut teams: IndexMap<String, (Vec<&RawRecord>, Vec<&RawRecord>)> = IndexMap::new();
    for row in &raw.rows {
        let Some(year) = year_of(row) else { continue };
        let mut team = lookup(row, &["Functional POVs"]);
        if team.is_empty() {
            team = DEFAULT_TEAM.to_string();
        }
        let slot = teams.entry(team).or_default();
        match year {
            Year::Y2025 => slot.0.push(row),
            Year::Y2026 => slot.1.push(row),
        }
    }

    let score_col = find_column(raw, "Average");
    let scores = |rows: &[&RawRecord]| -> Option<f64> {
        let col = score_col?;
        average_score(rows.iter().map(|r| raw.get(r, col)))
    };

    let comparison = teams
        .into_iter()
        .map(|(team, (rows_2025, rows_2026))| {
            let mut objectives: IndexMap<String, ObjectiveComparison> = IndexMap::new();
            for (rows, year) in [(&rows_2025, Year::Y2025), (&rows_2026, Year::Y2026)] {
                for row in rows {
                    let mut objective = lookup(row, &["Objective"]);
                    if objective.is_empty() {
                        objective = DEFAULT_OBJECTIVE.to_string();
                    }
                    let entry = objectives.entry(objective.clone()).or_insert_with(|| {
                        ObjectiveComparison { objective, items_2025: Vec::new(), items_2026: Vec::new() }
                    });
                    let item = display_record(raw, row);
                    match year {
                        Year::Y2025 => entry.items_2025.push(item),
                        Year::Y2026 => entry.items_2026.push(item),
                    }
                }
            }
            TeamComparison {
                team,
                objectives: objectives.into_values().collect(),
                avg_2025: scores(&rows_2025),
                avg_2026: scores(&rows_2026),
            }
        })
        .collect();

    OkrContext { title: "OKR Dashboard: 2025 vs 2026".to_string(), comparison }
}

fn display_record(raw: &RawTable, row: &RawRecord) -> CanonicalRecord {
    raw.columns
        .iter()
        .map(|c| (c.trim().to_string(), Field::Text(display(raw.get(row, c)))))
        .collect()
}
