//! Column classification for decoded reports.
//!
//! Two heuristics run over the decoded grid before rendering: date-column
//! detection (date columns are dropped from the display set) and header
//! title mapping (backend column keys get their Ukrainian display titles).

use std::collections::HashMap;

use serde::Serialize;

use crate::grid::Cell;

/// How many leading data rows are sampled for date detection.
pub const DATE_SAMPLE_ROWS: usize = 5;

/// A column selected and labeled for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayColumn {
    pub source_index: usize,
    pub title: String,
}

/// Maps a backend column key (or its display label) to a display title.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMapping {
    pub key: &'static str,
    pub title: &'static str,
}

/// The canonical report column mappings.
pub const REPORT_COLUMN_MAPPINGS: &[ColumnMapping] = &[
    ColumnMapping { key: "org", title: "Організація" },
    ColumnMapping { key: "budget", title: "Бюджет" },
    ColumnMapping { key: "cfo", title: "ЦФО" },
    ColumnMapping { key: "budget_object", title: "Об'єкт бюджетування" },
    ColumnMapping { key: "budget_item", title: "Статті бюджету" },
    ColumnMapping { key: "macro_item", title: "Макростатті" },
];

/// Classifier output: which columns are dates, and what to display.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub date_columns: Vec<usize>,
    pub display_columns: Vec<DisplayColumn>,
}

/// Literal `D/M/YYYY` / `DD/MM/YYYY` check.
///
/// This is a heuristic, not a date parser: `31/13/2024` passes, and the
/// day-first/month-first ambiguity is left alone. Other date shapes are
/// accepted false negatives.
pub fn is_short_date(text: &str) -> bool {
    fn digit_run(s: &str, min: usize, max: usize) -> bool {
        (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
    }

    let mut parts = text.split('/');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(day), Some(month), Some(year), None) => {
            digit_run(day, 1, 2) && digit_run(month, 1, 2) && digit_run(year, 4, 4)
        }
        _ => false,
    }
}

/// Indices of columns whose sampled cells contain a short-date value.
pub fn detect_date_columns(column_count: usize, data_rows: &[Vec<Cell>]) -> Vec<usize> {
    let sample = data_rows.get(..data_rows.len().min(DATE_SAMPLE_ROWS)).unwrap_or(data_rows);

    (0..column_count)
        .filter(|&index| {
            sample.iter().any(|row| {
                row.get(index)
                    .is_some_and(|cell| is_short_date(&cell.value.display_text()))
            })
        })
        .collect()
}

/// Map header indices to display titles using the known mappings.
///
/// The exact pass (case-insensitive equality against the key or the title)
/// fully precedes the partial pass (case-insensitive substring). Within a
/// pass, earlier mappings win; neither pass overwrites an already-mapped
/// index.
pub fn map_column_titles(
    headers: &[String],
    mappings: &[ColumnMapping],
) -> HashMap<usize, String> {
    fn first_unmapped(
        lowered: &[String],
        titles: &HashMap<usize, String>,
        pred: impl Fn(&str) -> bool,
    ) -> Option<usize> {
        lowered
            .iter()
            .enumerate()
            .find(|(index, header)| !titles.contains_key(index) && pred(header.as_str()))
            .map(|(index, _)| index)
    }

    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    let mut titles: HashMap<usize, String> = HashMap::new();

    for mapping in mappings {
        let key = mapping.key.to_lowercase();
        let label = mapping.title.to_lowercase();
        if let Some(index) = first_unmapped(&lowered, &titles, |h| h == key || h == label) {
            titles.insert(index, mapping.title.to_string());
        }
    }

    for mapping in mappings {
        let key = mapping.key.to_lowercase();
        let label = mapping.title.to_lowercase();
        if let Some(index) =
            first_unmapped(&lowered, &titles, |h| h.contains(&key) || h.contains(&label))
        {
            titles.insert(index, mapping.title.to_string());
        }
    }

    titles
}

/// Classify decoded headers into date columns and display columns.
///
/// An empty header list yields empty output; there are no error conditions.
pub fn classify(
    headers: &[String],
    data_rows: &[Vec<Cell>],
    mappings: &[ColumnMapping],
) -> Classification {
    let date_columns = detect_date_columns(headers.len(), data_rows);
    let titles = map_column_titles(headers, mappings);

    let display_columns = headers
        .iter()
        .enumerate()
        .filter(|(index, _)| !date_columns.contains(index))
        .map(|(index, header)| DisplayColumn {
            source_index: index,
            title: titles.get(&index).cloned().unwrap_or_else(|| {
                if header.is_empty() {
                    format!("Column {}", index + 1)
                } else {
                    header.clone()
                }
            }),
        })
        .collect();

    Classification {
        date_columns,
        display_columns,
    }
}
