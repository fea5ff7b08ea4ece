// Cell-level cleaning helpers.
//
// Everything workbook-shaped and dirty (thousands separators, currency and
// LaTeX markup, unit suffixes, the pandas "nan" token) is handled here so the
// report builders can work with plain strings and `Option<f64>`.
// None of these functions fail: unparseable input maps to the documented
// fallback of each function.
use crate::types::Cell;
use num_format::Locale;
use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder shown where a percentage cannot be computed.
pub const DASH: &str = "—";

static BOLD_MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\mathbf\{([^}]*)\}").unwrap());
static MATH_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$(.*?)\$").unwrap());
static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.\-]").unwrap());
static MAGNITUDE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([\d.]+)\s*([BML]?)").unwrap());

/// True for the textual "nan" token pandas leaves behind in empty cells.
pub fn is_nan_token(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("nan")
}

/// Parse a raw cell into `f64` while being forgiving about spreadsheet
/// formatting.
///
/// - Numeric cells pass through (NaN becomes `None`).
/// - Text drops `","` and whitespace, then every character outside
///   `[0-9.-]`, so `"$1,250"` and `"\mathbf{5,250}"` both parse.
/// - Returns `None` if nothing is left or the remainder is not a number.
pub fn parse_number(raw: &Cell) -> Option<f64> {
    match raw {
        Cell::Blank => None,
        Cell::Number(n) if n.is_finite() => Some(*n),
        Cell::Number(_) => None,
        Cell::Text(s) => parse_number_str(s),
    }
}

pub fn parse_number_str(s: &str) -> Option<f64> {
    let compact: String = s.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    let digits = NON_NUMERIC.replace_all(&compact, "");
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// `parse_number` followed by thousands separators and a fixed number of
/// decimals. Unparseable input renders as an empty string.
pub fn format_money(raw: &Cell, decimals: usize) -> String {
    match parse_number(raw) {
        Some(n) => format_number(n, decimals),
        None => String::new(),
    }
}

/// Whole-number variant of `format_money`. Falls back to `"0"` rather than
/// an empty string; totals read as zero while per-row money cells go blank.
pub fn format_int(raw: &Cell) -> String {
    match parse_number(raw) {
        Some(n) => format_number(n, 0),
        None => "0".to_string(),
    }
}

/// Percentage with one decimal. Values with magnitude <= 1 are treated as
/// fractions and scaled by 100 first.
pub fn format_percent(raw: &Cell) -> String {
    match parse_number(raw) {
        Some(n) if n.abs() <= 1.0 => format!("{:.1}%", n * 100.0),
        Some(n) => format!("{:.1}%", n),
        None => DASH.to_string(),
    }
}

/// Percentage for a value that is already on the 0..100 scale, such as a
/// computed month-over-month change.
pub fn format_percent_value(value: Option<f64>) -> String {
    match value {
        Some(n) if n.is_finite() => format!("{:.1}%", n),
        _ => DASH.to_string(),
    }
}

/// Strip LaTeX display markup: `\mathbf{x}` becomes `x`, `\rightarrow`
/// becomes `→` and `$...$` spans are unwrapped. Escapes inside the span
/// (like `\%`) are left alone. Non-text input yields an empty string.
pub fn clean_markup(raw: &Cell) -> String {
    match raw {
        Cell::Text(s) => clean_markup_str(s),
        _ => String::new(),
    }
}

pub fn clean_markup_str(text: &str) -> String {
    let text = BOLD_MARKUP.replace_all(text, "$1");
    let text = text.replace(r"\rightarrow", "→");
    let text = MATH_SPAN.replace_all(&text, "$1");
    text.trim().to_string()
}

/// Parse magnitude strings such as `"3.7 B"` or `"180 L"`.
///
/// B scales by 1e9, M by 1e6, L (lakh) by 1e5. Blank text comes back as an
/// empty text cell, text without any number is returned unchanged, and
/// non-text cells pass through.
pub fn clean_magnitude(raw: &Cell) -> Cell {
    let Cell::Text(s) = raw else {
        return raw.clone();
    };
    let s = s.trim();
    if s.is_empty() {
        return Cell::Text(String::new());
    }
    let Some(caps) = MAGNITUDE.captures(s) else {
        return Cell::Text(s.to_string());
    };
    let Ok(num) = caps[1].parse::<f64>() else {
        return Cell::Text(s.to_string());
    };
    let scale = match &caps[2] {
        "B" => 1_000_000_000.0,
        "M" => 1_000_000.0,
        "L" => 100_000.0,
        _ => 1.0,
    };
    Cell::Number(num * scale)
}

/// Display text for a cell: trimmed, `"nan"` collapsed to empty, whole
/// numbers printed without a fractional part.
pub fn display(raw: &Cell) -> String {
    match raw {
        Cell::Blank => String::new(),
        Cell::Number(n) if !n.is_finite() => String::new(),
        Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Cell::Number(n) => n.to_string(),
        Cell::Text(s) if is_nan_token(s) => String::new(),
        Cell::Text(s) => s.trim().to_string(),
    }
}

/// Format a floating-point value with a fixed number of decimal places and
/// `en` thousands separators (e.g. `1,234,567.89`).
pub fn format_number(n: f64, decimals: usize) -> String {
    if !n.is_finite() {
        return String::new();
    }
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let mut res = group_thousands(int_part);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    // "-0.00" is not a useful thing to show.
    let is_zero = s.chars().all(|c| c == '0' || c == '.');
    if n.is_sign_negative() && !is_zero {
        format!("-{}", res)
    } else {
        res
    }
}

// Works on the digit string so magnitudes past any integer type still group.
fn group_thousands(digits: &str) -> String {
    let sep = Locale::en.separator();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * sep.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(ch);
    }
    out
}
