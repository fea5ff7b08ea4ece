use crate::columns::{canonicalize, lookup};
use crate::loader::TableSource;
use crate::normalize::{clean_markup_str, display};
use crate::types::{sheets, CanonicalRecord, Cell, Field, RawTable};
use indexmap::IndexMap;
use serde::Serialize;

pub const PALETTE: [&str; 6] = ["#1976d2", "#ef6c00", "#2e7d32", "#6a1b9a", "#00838f", "#c62828"];
pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMeta {
    pub color: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FnaContext {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<CanonicalRecord>,
    /// KPI categories in first-seen order with their row counts.
    pub category_meta: IndexMap<String, CategoryMeta>,
}

pub fn build_fna(source: &dyn TableSource) -> FnaContext {
    fna_from_table(&source.load(sheets::FNA_PERFORMANCE))
}

pub fn fna_from_table(raw: &RawTable) -> FnaContext {
    let table = canonicalize(raw, &[]);
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let mut category = lookup(row, &["KPI Category"]);
            if category.is_empty() {
                category = DEFAULT_CATEGORY.to_string();
            }
            *counts.entry(category).or_default() += 1;
            table
                .columns
                .iter()
                .map(|c| {
                    let value = match table.get(row, c) {
                        Cell::Text(s) => clean_markup_str(s),
                        other => display(other),
                    };
                    (c.clone(), Field::Text(value))
                })
                .collect::<CanonicalRecord>()
        })
        .collect();

    let category_meta = counts
        .into_iter()
        .enumerate()
        .map(|(i, (category, count))| {
            (category, CategoryMeta { color: PALETTE[i % PALETTE.len()], count })
        })
        .collect();

    FnaContext {
        title: "FNA Performance".to_string(),
        columns: table.columns,
        rows,
        category_meta,
    }
}
