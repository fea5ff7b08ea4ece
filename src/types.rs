use indexmap::IndexMap;
use serde::Serialize;

/// A single cell as it came out of the workbook, before any cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Blank,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Blank => true,
            Cell::Number(n) => n.is_nan(),
            Cell::Text(s) => s.trim().is_empty(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

pub type RawRecord = IndexMap<String, Cell>;

/// One sheet worth of rows. `columns` carries the header order even when
/// there are no rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRecord>,
}

static BLANK: Cell = Cell::Blank;

impl RawTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Builds a table from a header list and positional rows. Short rows are
    /// padded with blanks; extra cells are ignored.
    pub fn from_rows<H, R, C>(columns: H, rows: Vec<R>) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let rows = rows
            .into_iter()
            .map(|r| {
                let mut cells = r.into_iter().map(Into::into);
                columns
                    .iter()
                    .map(|c| (c.clone(), cells.next().unwrap_or_default()))
                    .collect::<RawRecord>()
            })
            .collect();
        RawTable { columns, rows }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn get<'a>(&self, row: &'a RawRecord, column: &str) -> &'a Cell {
        row.get(column).unwrap_or(&BLANK)
    }
}

/// Cleaned value of a canonical field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Field {
    Text(String),
    Number(Option<f64>),
}

impl Field {
    pub fn as_str(&self) -> &str {
        match self {
            Field::Text(s) => s,
            _ => "",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Field::Number(n) => *n,
            _ => None,
        }
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::Text(s.to_string())
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Field::Text(s)
    }
}

pub type CanonicalRecord = IndexMap<String, Field>;

/// Named summary value handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Aggregate {
    Text(String),
    Number(Option<f64>),
}

impl Aggregate {
    pub fn as_str(&self) -> &str {
        match self {
            Aggregate::Text(s) => s,
            Aggregate::Number(_) => "",
        }
    }
}

impl From<&str> for Aggregate {
    fn from(s: &str) -> Self {
        Aggregate::Text(s.to_string())
    }
}

impl From<String> for Aggregate {
    fn from(s: String) -> Self {
        Aggregate::Text(s)
    }
}

/// Insertion-ordered grouping: the first row seen for a key fixes its slot.
pub type Grouped<T> = IndexMap<String, Vec<T>>;

pub fn group_push<T>(groups: &mut Grouped<T>, key: impl Into<String>, item: T) {
    groups.entry(key.into()).or_default().push(item);
}

/// Context for the flat, table-shaped reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableContext {
    pub title: String,
    pub description: String,
    pub columns: Vec<String>,
    pub rows: Vec<CanonicalRecord>,
    pub aggregates: IndexMap<String, Aggregate>,
    pub insight: String,
}

impl TableContext {
    pub fn aggregate(&self, name: &str) -> &str {
        self.aggregates.get(name).map(Aggregate::as_str).unwrap_or("")
    }
}

/// How year-over-year totals treat rows where one side is zero.
///
/// The live comparison view sums every row; the snapshot view only sums
/// months where both years carry a value. The two have drifted apart and are
/// kept side by side until product decides which one is right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AggregationPolicy {
    Unconditional,
    BothNonzero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Dashboard,
    Target,
    Comparison,
    ComparisonSnapshot,
    StrategyPlan,
    Roadmap,
    Swot,
    CostPerX,
    Okr,
    Fna,
    OperationHealth,
    Bob,
}

impl ReportKind {
    pub const ALL: [ReportKind; 12] = [
        ReportKind::Dashboard,
        ReportKind::Target,
        ReportKind::Comparison,
        ReportKind::ComparisonSnapshot,
        ReportKind::StrategyPlan,
        ReportKind::Roadmap,
        ReportKind::Swot,
        ReportKind::CostPerX,
        ReportKind::Okr,
        ReportKind::Fna,
        ReportKind::OperationHealth,
        ReportKind::Bob,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            ReportKind::Dashboard => "dashboard",
            ReportKind::Target => "ecom_target",
            ReportKind::Comparison => "ecom_comparison",
            ReportKind::ComparisonSnapshot => "ecom_comparison_snapshot",
            ReportKind::StrategyPlan => "strategy_plan",
            ReportKind::Roadmap => "roadmap",
            ReportKind::Swot => "swot",
            ReportKind::CostPerX => "cost_per_x",
            ReportKind::Okr => "okr",
            ReportKind::Fna => "fna_performance",
            ReportKind::OperationHealth => "operation_health",
            ReportKind::Bob => "bob",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Dashboard => "Strategy Dashboard",
            ReportKind::Target => "2026 Target Plan",
            ReportKind::Comparison => "2024 vs 2025 Performance",
            ReportKind::ComparisonSnapshot => "2024 vs 2025 Performance (snapshot)",
            ReportKind::StrategyPlan => "2026 Strategy Plan",
            ReportKind::Roadmap => "Roadmap",
            ReportKind::Swot => "SWOT",
            ReportKind::CostPerX => "Cost per X",
            ReportKind::Okr => "OKR Dashboard: 2025 vs 2026",
            ReportKind::Fna => "FNA Performance",
            ReportKind::OperationHealth => "Operations Health",
            ReportKind::Bob => "BOB Performance",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        let slug = slug.trim().to_lowercase();
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }
}

pub mod sheets {
    pub const ECOM_TARGET: &str = "2026 Ecom Target";
    pub const ECOM_COMPARISON: &str = "ecom 2024 vs 2025";
    pub const STRATEGY_PLAN: &str = "2026 Strategy plan";
    pub const ROADMAP: &str = "roadmap";
    pub const SWOT: &str = "swot";
    pub const COST_PER_X: &str = "Cost per X";
    pub const OKR: &str = "okr";
    pub const FNA_PERFORMANCE: &str = "fna_performance";
    pub const OPERATION_HEALTH: &str = "operation_health";
    pub const BOB: &str = "BOB";
    pub const BOB_REVIEW: &str = "BOB_review";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_pads_short_rows() {
        let t = RawTable::from_rows(["A", "B"], vec![vec![Cell::from("x")]]);
        assert_eq!(t.rows[0]["A"], Cell::text("x"));
        assert_eq!(t.rows[0]["B"], Cell::Blank);
    }

    #[test]
    fn get_missing_column_is_blank() {
        let t = RawTable::from_rows(["A"], vec![vec![Cell::from(1.0)]]);
        assert_eq!(t.get(&t.rows[0], "Nope"), &Cell::Blank);
    }

    #[test]
    fn grouping_keeps_first_seen_order() {
        let mut g: Grouped<u32> = Grouped::new();
        for (i, k) in ["B", "A", "B", "C"].iter().enumerate() {
            group_push(&mut g, *k, i as u32);
        }
        let keys: Vec<&str> = g.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["B", "A", "C"]);
        assert_eq!(g["B"], vec![0, 2]);
    }

    #[test]
    fn report_slugs_round_trip() {
        for k in ReportKind::ALL {
            assert_eq!(ReportKind::from_slug(k.slug()), Some(k));
        }
        assert_eq!(ReportKind::from_slug("unknown"), None);
    }
}
