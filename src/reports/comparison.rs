use crate::columns::find_column;
use crate::loader::TableSource;
use crate::normalize::{display, format_int, format_percent_value, parse_number};
use crate::types::{
    sheets, AggregationPolicy, Aggregate, CanonicalRecord, Cell, Field, RawTable, TableContext,
};

pub const COLUMNS: [&str; 3] = ["Months", "2024", "2025"];

/// One month of the year-over-year sheet after cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthRow {
    pub month: String,
    pub v2024: f64,
    pub v2025: f64,
    pub delta: f64,
    pub delta_pct: Option<f64>,
}

impl MonthRow {
    pub fn new(month: impl Into<String>, v2024: f64, v2025: f64) -> Self {
        let delta = v2025 - v2024;
        let delta_pct = if v2024 != 0.0 { Some(delta / v2024 * 100.0) } else { None };
        MonthRow { month: month.into(), v2024, v2025, delta, delta_pct }
    }

    fn is_december(&self) -> bool {
        let m = self.month.to_lowercase();
        m == "dec" || m == "december"
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub total_2024: f64,
    pub total_2025: f64,
    /// Rows that contributed to the totals; at least 1.
    pub count: usize,
}

impl Totals {
    pub fn avg_2024(&self) -> f64 {
        self.total_2024 / self.count as f64
    }

    pub fn avg_2025(&self) -> f64 {
        self.total_2025 / self.count as f64
    }
}

pub fn totals(rows: &[MonthRow], policy: AggregationPolicy) -> Totals {
    let mut t = Totals::default();
    let mut contributing = 0usize;
    for r in rows {
        let counts = match policy {
            AggregationPolicy::Unconditional => true,
            AggregationPolicy::BothNonzero => r.v2024 != 0.0 && r.v2025 != 0.0,
        };
        if counts {
            t.total_2024 += r.v2024;
            t.total_2025 += r.v2025;
            contributing += 1;
        }
    }
    t.count = match policy {
        AggregationPolicy::Unconditional => rows.len(),
        AggregationPolicy::BothNonzero => contributing,
    }
    .max(1);
    t
}

/// Highest 2025 value; the earliest month wins a tie.
pub fn best_month(rows: &[MonthRow]) -> Option<&MonthRow> {
    rows.iter().fold(None, |best: Option<&MonthRow>, r| match best {
        Some(b) if b.v2025 >= r.v2025 => Some(b),
        _ => Some(r),
    })
}

/// Lowest 2025 value, ignoring December unless it is the only month left.
pub fn worst_month(rows: &[MonthRow]) -> Option<&MonthRow> {
    let eligible: Vec<&MonthRow> = rows.iter().filter(|r| !r.is_december()).collect();
    let pool: Vec<&MonthRow> = if eligible.is_empty() { rows.iter().collect() } else { eligible };
    pool.into_iter().fold(None, |worst: Option<&MonthRow>, r| match worst {
        Some(w) if w.v2025 <= r.v2025 => Some(w),
        _ => Some(r),
    })
}

pub fn month_rows(raw: &RawTable) -> Vec<MonthRow> {
    // Only the three known columns matter.
    let months_col = find_column(raw, COLUMNS[0]);
    let col_2024 = find_column(raw, COLUMNS[1]);
    let col_2025 = find_column(raw, COLUMNS[2]);
    raw.rows
        .iter()
        .map(|row| {
            let value = |col: Option<&String>| {
                col.and_then(|c| parse_number(raw.get(row, c))).unwrap_or(0.0)
            };
            let month = months_col.map(|c| display(raw.get(row, c))).unwrap_or_default();
            MonthRow::new(month, value(col_2024), value(col_2025))
        })
        .collect()
}

pub fn build_comparison(source: &dyn TableSource, policy: AggregationPolicy) -> TableContext {
    comparison_from_table(&source.load(sheets::ECOM_COMPARISON), policy)
}

pub fn comparison_from_table(raw: &RawTable, policy: AggregationPolicy) -> TableContext {
    let rows = month_rows(raw);
    let t = totals(&rows, policy);
    let best = best_month(&rows);
    let worst = worst_month(&rows);

    let mut ctx = TableContext {
        title: "E-commerce Performance".to_string(),
        description: "2024 vs 2025 performance snapshot.".to_string(),
        columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows: rows.iter().map(month_record).collect(),
        ..Default::default()
    };

    let a = &mut ctx.aggregates;
    a.insert("total_2024".into(), fmt(t.total_2024).into());
    a.insert("total_2025".into(), fmt(t.total_2025).into());
    a.insert("avg_2024".into(), fmt(t.avg_2024()).into());
    a.insert("avg_2025".into(), fmt(t.avg_2025()).into());
    a.insert("max_month".into(), best.map_or("-".to_string(), |r| r.month.clone()).into());
    a.insert("max_value".into(), best.map_or("0".to_string(), |r| fmt(r.v2025)).into());
    a.insert("min_month".into(), worst.map_or("-".to_string(), |r| r.month.clone()).into());
    a.insert("min_value".into(), worst.map_or("0".to_string(), |r| fmt(r.v2025)).into());
    a.insert("total_2024_value".into(), Aggregate::Number(Some(t.total_2024)));
    a.insert("total_2025_value".into(), Aggregate::Number(Some(t.total_2025)));
    ctx
}

fn fmt(n: f64) -> String {
    format_int(&Cell::Number(n))
}

fn month_record(r: &MonthRow) -> CanonicalRecord {
    let mut rec = CanonicalRecord::new();
    rec.insert("Months".into(), Field::Text(r.month.clone()));
    rec.insert("2024".into(), Field::Number(Some(r.v2024)));
    rec.insert("2025".into(), Field::Number(Some(r.v2025)));
    rec.insert("2024_fmt".into(), fmt(r.v2024).into());
    rec.insert("2025_fmt".into(), fmt(r.v2025).into());
    rec.insert("delta".into(), Field::Number(Some(r.delta)));
    rec.insert("delta_fmt".into(), fmt(r.delta).into());
    rec.insert("delta_pct".into(), Field::Number(r.delta_pct));
    rec.insert("delta_pct_fmt".into(), format_percent_value(r.delta_pct).into());
    rec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::DASH;

    fn sample() -> RawTable {
        RawTable::from_rows(
            ["Months ", "2024", "2025", "Notes"],
            vec![
                vec![Cell::from("Jan"), Cell::from(100.0), Cell::from(150.0), Cell::Blank],
                vec![Cell::from("Feb"), Cell::from(0.0), Cell::from(50.0), Cell::Blank],
                vec![Cell::from("Dec"), Cell::from(200.0), Cell::from(0.0), Cell::Blank],
            ],
        )
    }

    #[test]
    fn unconditional_totals_and_extremes() {
        let ctx = comparison_from_table(&sample(), AggregationPolicy::Unconditional);
        assert_eq!(ctx.aggregate("total_2024"), "300");
        assert_eq!(ctx.aggregate("total_2025"), "200");
        assert_eq!(ctx.aggregate("avg_2024"), "100");
        assert_eq!(ctx.aggregate("max_month"), "Jan");
        assert_eq!(ctx.aggregate("max_value"), "150");
        assert_eq!(ctx.aggregate("min_month"), "Feb");
        assert_eq!(ctx.aggregate("min_value"), "50");
    }

    #[test]
    fn both_nonzero_only_counts_complete_months() {
        let rows = month_rows(&sample());
        let t = totals(&rows, AggregationPolicy::BothNonzero);
        assert_eq!(t.total_2024, 100.0);
        assert_eq!(t.total_2025, 150.0);
        assert_eq!(t.count, 1);
    }

    #[test]
    fn delta_pct_is_none_when_base_is_zero() {
        let ctx = comparison_from_table(&sample(), AggregationPolicy::Unconditional);
        assert_eq!(ctx.rows[0]["delta_pct"].as_number(), Some(50.0));
        assert_eq!(ctx.rows[0]["delta_pct_fmt"].as_str(), "50.0%");
        assert_eq!(ctx.rows[1]["delta_pct"].as_number(), None);
        assert_eq!(ctx.rows[1]["delta_pct_fmt"].as_str(), DASH);
        assert_eq!(ctx.rows[2]["delta_fmt"].as_str(), "-200");
    }

    #[test]
    fn headers_match_ignoring_case_and_spacing() {
        let table = RawTable::from_rows(
            ["months", " 2024", "2025\t"],
            vec![vec![Cell::from("Mar"), Cell::from("40"), Cell::from("60")]],
        );
        let rows = month_rows(&table);
        assert_eq!(rows[0].month, "Mar");
        assert_eq!(rows[0].v2024, 40.0);
        assert_eq!(rows[0].v2025, 60.0);
    }

    #[test]
    fn ties_keep_first_month() {
        let rows = vec![MonthRow::new("Jan", 1.0, 5.0), MonthRow::new("Feb", 1.0, 5.0)];
        assert_eq!(best_month(&rows).map(|r| r.month.as_str()), Some("Jan"));
        assert_eq!(worst_month(&rows).map(|r| r.month.as_str()), Some("Jan"));
    }

    #[test]
    fn december_only_falls_back_to_full_set() {
        let rows = vec![MonthRow::new("December", 1.0, 5.0)];
        assert_eq!(worst_month(&rows).map(|r| r.month.as_str()), Some("December"));
    }

    #[test]
    fn empty_table_uses_fallbacks() {
        let ctx = comparison_from_table(&RawTable::empty(), AggregationPolicy::Unconditional);
        assert!(ctx.rows.is_empty());
        assert_eq!(ctx.aggregate("total_2024"), "0");
        assert_eq!(ctx.aggregate("avg_2025"), "0");
        assert_eq!(ctx.aggregate("max_month"), "-");
        assert_eq!(ctx.aggregate("min_value"), "0");
    }
}
