//! The decoded report data model.
//!
//! A `Grid` is the normalized content of one report worksheet: row 0 is the
//! header, the rest are data rows, and every row has the header's width.
//! Grids are immutable once decoded; a new file replaces the grid wholesale.

use serde::Serialize;

/// Raw decoded content of a single cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// A numeric cell.
    Number(f64),
    /// A text cell (shared, inline, boolean, or error text).
    Text(String),
    /// An empty cell (serialized as `null`).
    Empty,
}

impl CellValue {
    /// The display text of the cell; empty cells render as "".
    pub fn display_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Empty => String::new(),
        }
    }

    /// Numeric value, coercing numeric-looking text.
    pub fn coerce_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Empty => None,
        }
    }

    /// Whether this is a true number cell (no text coercion).
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }
}

/// Visual style captured from the source file's fill and font records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStyle {
    /// Solid-fill foreground as `#RRGGBB` (alpha stripped).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Explicit font color as `#RRGGBB`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    pub bold: bool,
    pub italic: bool,
}

impl CellStyle {
    /// True when nothing was captured; such styles are dropped from the cell.
    pub fn is_empty(&self) -> bool {
        self.background_color.is_none() && self.text_color.is_none() && !self.bold && !self.italic
    }
}

/// A single decoded cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub value: CellValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
    /// Source-declared number format code (e.g., `0.00%`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_format: Option<String>,
}

impl Cell {
    /// An empty, unstyled cell.
    pub fn empty() -> Self {
        Self {
            value: CellValue::Empty,
            style: None,
            number_format: None,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: CellValue::Text(value.into()),
            style: None,
            number_format: None,
        }
    }

    pub fn number(value: f64) -> Self {
        Self {
            value: CellValue::Number(value),
            style: None,
            number_format: None,
        }
    }
}

/// Normalized worksheet content: header row plus data rows, rectangular.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of the grid (the header row's column count).
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Header cell display texts, in column order.
    pub fn headers(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.iter().map(|c| c.value.display_text()).collect())
            .unwrap_or_default()
    }

    /// Data rows (everything below the header).
    pub fn data_rows(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }
}
