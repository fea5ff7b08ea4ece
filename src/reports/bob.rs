use crate::columns::{canonicalize, header_key, BOB_RULES};
use crate::loader::TableSource;
use crate::normalize::{display, format_int, format_percent, parse_number};
use crate::types::{sheets, Aggregate, CanonicalRecord, Cell, Field, RawTable, TableContext};
use indexmap::IndexMap;
use serde::Serialize;

pub const COLUMNS: [&str; 5] = ["Months", "BOB Order", "Self Order", "Grand Total", "CS%"];

/// Review questions in display order as (key, label). The label doubles as
/// the expected sheet header.
pub const REVIEW_SECTIONS: [(&str, &str); 5] = [
    ("worked", "What Worked?"),
    ("scale", "What needs to scale?"),
    ("not_work", "What did not work?"),
    ("lesson", "What is the lesson learned?"),
    ("next_goal", "What is the next goal for BOB?"),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub months: Vec<String>,
    pub bob: Vec<f64>,
    pub self_order: Vec<f64>,
    pub cs: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSection {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BobContext {
    pub table: TableContext,
    pub chart: ChartSeries,
    pub review_sections: Vec<ReviewSection>,
    /// One entry per review row; each maps a section key to its bullet items.
    pub reviews: Vec<IndexMap<String, Vec<String>>>,
}

/// Split a review cell into bullet items: one per line, list markers removed.
pub fn parse_review_text(raw: &Cell) -> Vec<String> {
    display(raw)
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(strip_bullet)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    let line = line.trim_start_matches(['-', '*', '•']).trim_start();
    // "1." / "2)" numbering
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(stripped) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return stripped.trim();
        }
    }
    line
}

pub fn build_bob(source: &dyn TableSource) -> BobContext {
    bob_from_tables(&source.load(sheets::BOB), &source.load(sheets::BOB_REVIEW))
}

pub fn bob_from_tables(orders: &RawTable, review: &RawTable) -> BobContext {
    let orders = canonicalize(orders, BOB_RULES);

    let mut table = TableContext {
        title: "BOB Performance".to_string(),
        description: "Monthly BOB volume split with qualitative learnings".to_string(),
        columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
        ..Default::default()
    };
    let mut chart = ChartSeries::default();
    let (mut total_bob, mut total_self, mut total_grand) = (0.0, 0.0, 0.0);
    let mut cs_fractions: Vec<f64> = Vec::new();
    let mut best: Option<(String, f64)> = None;

    for row in &orders.rows {
        let month = display(orders.get(row, "Months"));
        let bob = parse_number(orders.get(row, "BOB Order")).unwrap_or(0.0);
        let self_order = parse_number(orders.get(row, "Self Order")).unwrap_or(0.0);
        let grand = parse_number(orders.get(row, "Grand Total")).unwrap_or(0.0);
        let cs = parse_number(orders.get(row, "CS%"));

        let mut rec = CanonicalRecord::new();
        rec.insert("Months".into(), Field::Text(month.clone()));
        rec.insert("BOB Order".into(), int(bob).into());
        rec.insert("Self Order".into(), int(self_order).into());
        rec.insert("Grand Total".into(), int(grand).into());
        rec.insert("CS%".into(), format_percent(&cs.map_or(Cell::Blank, Cell::Number)).into());
        table.rows.push(rec);

        chart.months.push(month.clone());
        chart.bob.push(bob);
        chart.self_order.push(self_order);
        chart.cs.push(match cs {
            Some(v) if v.abs() <= 1.0 => v * 100.0,
            Some(v) => v,
            None => 0.0,
        });

        total_bob += bob;
        total_self += self_order;
        total_grand += grand;
        if let Some(v) = cs {
            cs_fractions.push(if v.abs() <= 1.0 { v } else { v / 100.0 });
        }
        // Strictly greater: a later month has to beat the earlier one.
        if grand > best.as_ref().map_or(0.0, |(_, v)| *v) {
            best = Some((month, grand));
        }
    }

    let avg_cs = if cs_fractions.is_empty() {
        Cell::Blank
    } else {
        Cell::Number(cs_fractions.iter().sum::<f64>() / cs_fractions.len() as f64)
    };
    let a = &mut table.aggregates;
    a.insert("total_bob".into(), int(total_bob).into());
    a.insert("total_self".into(), int(total_self).into());
    a.insert("total_grand".into(), int(total_grand).into());
    a.insert("avg_cs".into(), format_percent(&avg_cs).into());
    let (best_label, best_value) = best.unwrap_or_else(|| ("-".to_string(), 0.0));
    a.insert("best_month".into(), Aggregate::Text(best_label));
    a.insert("best_month_value".into(), int(best_value).into());

    BobContext {
        table,
        chart,
        review_sections: REVIEW_SECTIONS
            .iter()
            .map(|&(key, label)| ReviewSection { key, label })
            .collect(),
        reviews: reviews(review),
    }
}

fn reviews(review: &RawTable) -> Vec<IndexMap<String, Vec<String>>> {
    // Map each sheet column to its section key once.
    let keyed: Vec<(&String, &'static str)> = review
        .columns
        .iter()
        .filter_map(|col| {
            let k = header_key(col);
            REVIEW_SECTIONS
                .iter()
                .find(|(_, label)| label.to_lowercase() == k)
                .map(|(key, _)| (col, *key))
        })
        .collect();

    review
        .rows
        .iter()
        .filter_map(|row| {
            let mut entry: IndexMap<String, Vec<String>> =
                REVIEW_SECTIONS.iter().map(|(key, _)| (key.to_string(), Vec::new())).collect();
            for (col, key) in &keyed {
                entry.insert(key.to_string(), parse_review_text(review.get(row, col)));
            }
            entry.values().any(|items| !items.is_empty()).then_some(entry)
        })
        .collect()
}

fn int(n: f64) -> String {
    format_int(&Cell::Number(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> RawTable {
        RawTable::from_rows(
            ["Month", "BOB", "self", "Total", "CS %"],
            vec![
                vec![Cell::from("Jan"), Cell::from("1,200"), Cell::from(800.0), Cell::from(2000.0), Cell::from(0.25)],
                vec![Cell::from("Feb"), Cell::from(900.0), Cell::from(1100.0), Cell::from(2000.0), Cell::from(75.0)],
                vec![Cell::from("Mar"), Cell::Blank, Cell::from("n/a"), Cell::Blank, Cell::Blank],
            ],
        )
    }

    #[test]
    fn totals_and_best_month() {
        let ctx = bob_from_tables(&orders(), &RawTable::empty());
        let t = &ctx.table;
        assert_eq!(t.aggregate("total_bob"), "2,100");
        assert_eq!(t.aggregate("total_self"), "1,900");
        assert_eq!(t.aggregate("total_grand"), "4,000");
        assert_eq!(t.aggregate("avg_cs"), "50.0%");
        assert_eq!(t.aggregate("best_month"), "Jan");
        assert_eq!(t.aggregate("best_month_value"), "2,000");
        assert_eq!(t.rows[0]["CS%"].as_str(), "25.0%");
        assert_eq!(t.rows[2]["CS%"].as_str(), "—");
        assert_eq!(ctx.chart.cs, vec![25.0, 75.0, 0.0]);
    }

    #[test]
    fn empty_sheets_fall_back() {
        let ctx = bob_from_tables(&RawTable::empty(), &RawTable::empty());
        assert!(ctx.table.rows.is_empty());
        assert_eq!(ctx.table.aggregate("best_month"), "-");
        assert_eq!(ctx.table.aggregate("best_month_value"), "0");
        assert_eq!(ctx.table.aggregate("avg_cs"), "—");
        assert!(ctx.reviews.is_empty());
        assert_eq!(ctx.review_sections.len(), 5);
    }

    #[test]
    fn reviews_split_into_items() {
        let review = RawTable::from_rows(
            ["What Worked? ", "what did not work?", "Other"],
            vec![
                vec!["- Bundles\r\n- Live chat", "1. Slow delivery", "x"],
                vec!["", "", "ignored"],
            ],
        );
        let ctx = bob_from_tables(&RawTable::empty(), &review);
        assert_eq!(ctx.reviews.len(), 1);
        assert_eq!(ctx.reviews[0]["worked"], vec!["Bundles", "Live chat"]);
        assert_eq!(ctx.reviews[0]["not_work"], vec!["Slow delivery"]);
        assert!(ctx.reviews[0]["lesson"].is_empty());
    }

    #[test]
    fn strip_bullet_markers() {
        assert_eq!(strip_bullet("• item"), "item");
        assert_eq!(strip_bullet("2) next"), "next");
        assert_eq!(strip_bullet("2025 plan"), "2025 plan");
    }
}
