//! Numeric presentation rules for rendered reports.
//!
//! All numbers render in Ukrainian conventions: non-breaking-space thousands
//! grouping and a comma decimal separator. Decimal precision adapts to the
//! magnitude of the value, percent columns keep the backend's two encodings
//! apart (true percent format vs. pre-multiplied value), and currency is
//! hryvnia.

/// Thousands separator (non-breaking space, as uk-UA grouping renders).
pub const GROUP_SEPARATOR: char = '\u{a0}';

/// Headers that mark a column as numeric even when its cells arrive as text.
pub const NUMERIC_COLUMN_HINTS: &[&str] = &[
    "amount",
    "plan",
    "fact",
    "deviation",
    "total",
    "сума",
    "план",
    "факт",
    "відхилення",
];

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

/// Format a value with fixed decimals in uk-UA conventions.
pub fn format_uk(value: f64, decimals: usize) -> String {
    let fixed = format!("{value:.decimals$}");
    let (sign, unsigned) = fixed
        .strip_prefix('-')
        .map_or(("", fixed.as_str()), |rest| ("-", rest));

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let mut out = String::with_capacity(fixed.len() + 4);
    out.push_str(sign);
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}

/// Magnitude-adaptive decimal precision.
///
/// `|v| >= 10000` keeps 2 decimals, `>= 1000` drops to 1, tiny nonzero
/// values (`< 0.01`) get 3, everything else 2.
pub fn format_magnitude(value: f64) -> String {
    let abs = value.abs();
    let decimals = if abs >= 10_000.0 {
        2
    } else if abs >= 1_000.0 {
        1
    } else if abs > 0.0 && abs < 0.01 {
        3
    } else {
        2
    };
    format_uk(value, decimals)
}

/// Percent rendering with the backend's two encodings kept apart.
///
/// `stored_as_fraction` is true when the cell's own number format is a
/// percent format (the value is a fraction and gets multiplied by 100);
/// percent-labeled columns without such a format carry already-multiplied
/// display numbers and only get the literal `%` suffix. Do not normalize
/// the two paths - see the rendering contract.
pub fn format_percent(value: f64, stored_as_fraction: bool) -> String {
    let shown = if stored_as_fraction { value * 100.0 } else { value };
    let mut out = format_uk(shown, 2);
    out.push('%');
    out
}

/// Hryvnia currency rendering for summary figures: `1 234,56 ₴`.
pub fn format_currency_uah(value: f64) -> String {
    let mut out = format_uk(value, 2);
    out.push(GROUP_SEPARATOR);
    out.push('₴');
    out
}

/// Whether a number format code is a percent format (`%` outside quotes).
pub fn is_percent_code(code: &str) -> bool {
    let mut in_quotes = false;
    for ch in code.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '%' if !in_quotes => return true,
            _ => {}
        }
    }
    false
}

/// Whether a header labels a percentage column.
pub fn header_signals_percent(header: &str) -> bool {
    if header.contains('%') {
        return true;
    }
    let lower = header.to_lowercase();
    lower.contains("percent") || lower.contains("відсот")
}

/// Whether a header is on the known numeric-column list.
pub fn header_signals_numeric(header: &str) -> bool {
    let lower = header.to_lowercase();
    NUMERIC_COLUMN_HINTS.iter().any(|hint| lower.contains(hint))
}
