// Header canonicalization.
//
// Different workbook revisions spell the same column differently
// ("BOB", "BOB Order", "boborder"). Each report carries an ordered rule list;
// a header is lower-cased, whitespace-normalized and renamed by the first rule
// that matches it.
use crate::normalize::display;
use crate::types::{Cell, RawRecord, RawTable};
use tracing::debug;

/// Collapse runs of whitespace (NBSP and tabs included) to one space and trim.
pub fn normalize_header(header: &str) -> String {
    header
        .split(|c: char| c.is_whitespace() || c == '\u{00A0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Comparison key for a header: normalized and lower-cased.
pub fn header_key(header: &str) -> String {
    normalize_header(header).to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    Contains(&'static str),
    StartsWith(&'static str),
    Equals(&'static str),
}

impl Matcher {
    pub fn matches(self, key: &str) -> bool {
        match self {
            Matcher::Contains(s) => key.contains(s),
            Matcher::StartsWith(s) => key.starts_with(s),
            Matcher::Equals(s) => key == s,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnRule {
    pub matcher: Matcher,
    pub canonical: &'static str,
}

const fn rule(matcher: Matcher, canonical: &'static str) -> ColumnRule {
    ColumnRule { matcher, canonical }
}

pub const COST_PER_X_RULES: &[ColumnRule] = &[
    rule(Matcher::Contains("cost per x"), "Cost per X"),
    rule(Matcher::StartsWith("facts"), "Facts"),
    rule(Matcher::StartsWith("why"), "Why?"),
    rule(Matcher::Contains("what to improve"), "What to Improve More?"),
    rule(Matcher::Contains("improve"), "What to Improve More?"),
];

pub const BOB_RULES: &[ColumnRule] = &[
    rule(Matcher::Equals("months"), "Months"),
    rule(Matcher::Equals("month"), "Months"),
    rule(Matcher::Equals("bob order"), "BOB Order"),
    rule(Matcher::Equals("bob"), "BOB Order"),
    rule(Matcher::Equals("boborder"), "BOB Order"),
    rule(Matcher::Equals("self order"), "Self Order"),
    rule(Matcher::Equals("self"), "Self Order"),
    rule(Matcher::Equals("grand total"), "Grand Total"),
    rule(Matcher::Equals("total"), "Grand Total"),
    rule(Matcher::Equals("cs%"), "CS%"),
    rule(Matcher::Equals("cs %"), "CS%"),
    rule(Matcher::Equals("cs percentage"), "CS%"),
];

/// Canonical name for a header, or `None` when no rule fires.
pub fn canonical_name(header: &str, rules: &[ColumnRule]) -> Option<&'static str> {
    let key = header_key(header);
    rules
        .iter()
        .find(|r| r.matcher.matches(&key))
        .map(|r| r.canonical)
}

/// Rename every header in place of normalization + rules. Unmatched headers
/// keep their normalized spelling. When two headers map to the same canonical
/// name the first one wins and the later one keeps its own name.
pub fn canonicalize(table: &RawTable, rules: &[ColumnRule]) -> RawTable {
    let mut renamed: Vec<String> = Vec::with_capacity(table.columns.len());
    for original in &table.columns {
        let normalized = normalize_header(original);
        let target = match canonical_name(&normalized, rules) {
            Some(c) if !renamed.iter().any(|r| r == c) => c.to_string(),
            Some(c) => {
                debug!(header = %original, canonical = c, "canonical column already taken");
                normalized
            }
            None => normalized,
        };
        renamed.push(dedupe(&renamed, target));
    }
    let rows = table
        .rows
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .zip(&renamed)
                .map(|(old, new)| (new.clone(), row.get(old).cloned().unwrap_or_default()))
                .collect::<RawRecord>()
        })
        .collect();
    RawTable { columns: renamed, rows }
}

fn dedupe(existing: &[String], name: String) -> String {
    if !existing.contains(&name) {
        return name;
    }
    (1..)
        .map(|n| format!("{}.{}", name, n))
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or(name)
}

/// Add a blank column for every required name the table lacks.
pub fn ensure_columns(table: &mut RawTable, required: &[&str]) {
    for col in required {
        if table.has_column(col) {
            continue;
        }
        debug!(column = *col, "synthesising missing column");
        table.columns.push(col.to_string());
        for row in &mut table.rows {
            row.insert(col.to_string(), Cell::Blank);
        }
    }
}

/// The table's own header for `name`, compared case- and
/// whitespace-insensitively.
pub fn find_column<'a>(table: &'a RawTable, name: &str) -> Option<&'a String> {
    let wanted = header_key(name);
    table.columns.iter().find(|c| header_key(c) == wanted)
}

/// Case- and whitespace-insensitive lookup trying each alternative key in
/// turn. Returns the display text of the first key present in the record.
pub fn lookup(record: &RawRecord, keys: &[&str]) -> String {
    for key in keys {
        let wanted = header_key(key);
        if let Some((_, value)) = record.iter().find(|(k, _)| header_key(k) == wanted) {
            return display(value);
        }
    }
    String::new()
}

/// Like `lookup`, but keeps trying alternatives while the value is blank.
pub fn lookup_non_empty(record: &RawRecord, keys: &[&str]) -> String {
    keys.iter()
        .map(|k| lookup(record, std::slice::from_ref(k)))
        .find(|v| !v.is_empty())
        .unwrap_or_default()
}
