//! HTML table rendering for one page of a decoded report.
//!
//! The output is a plain `<table>` the dashboard injects into its panel:
//! a synthetic `№` column with absolute data-row numbers, mapped header
//! titles, per-cell style passthrough, and uk-UA numeric formatting.

use crate::classify::DisplayColumn;
use crate::format::{
    format_magnitude, format_percent, header_signals_numeric, header_signals_percent,
    is_percent_code,
};
use crate::grid::{Cell, Grid};
use crate::paginate::Paginator;

/// Rendering switches.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Apply captured cell styles (fill, font color, bold, italic).
    pub apply_styles: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { apply_styles: true }
    }
}

/// Escape text for HTML body and attribute positions.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Formatted content plus alignment for one body cell.
struct RenderedCell {
    text: String,
    numeric: bool,
}

fn render_cell_value(cell: &Cell, raw_header: &str) -> RenderedCell {
    let declared_percent = cell
        .number_format
        .as_deref()
        .is_some_and(is_percent_code);
    let column_is_numeric = cell.value.is_number()
        || header_signals_numeric(raw_header)
        || header_signals_percent(raw_header);
    let numeric_value = if column_is_numeric {
        cell.value.coerce_number()
    } else {
        None
    };

    let Some(value) = numeric_value else {
        return RenderedCell {
            text: escape_html(&cell.value.display_text()),
            numeric: false,
        };
    };

    let text = if declared_percent {
        format_percent(value, true)
    } else if header_signals_percent(raw_header) {
        format_percent(value, false)
    } else {
        format_magnitude(value)
    };

    RenderedCell {
        text,
        numeric: true,
    }
}

fn cell_style_attr(cell: &Cell, numeric: bool, options: &RenderOptions) -> String {
    let mut css = String::new();
    if numeric {
        css.push_str("text-align:right;");
    } else {
        css.push_str("text-align:left;");
    }

    if options.apply_styles {
        if let Some(style) = cell.style.as_ref() {
            if let Some(bg) = style.background_color.as_deref() {
                css.push_str("background-color:");
                css.push_str(&escape_html(bg));
                css.push(';');
            }
            if let Some(color) = style.text_color.as_deref() {
                css.push_str("color:");
                css.push_str(&escape_html(color));
                css.push(';');
            }
            if style.bold {
                css.push_str("font-weight:bold;");
            }
            if style.italic {
                css.push_str("font-style:italic;");
            }
        }
    }

    format!(" style=\"{css}\"")
}

/// Render the paginator's current window of the grid as an HTML table.
///
/// Missing cell values render as empty strings; there are no error
/// conditions at this layer.
pub fn render_page(
    grid: &Grid,
    columns: &[DisplayColumn],
    pager: &Paginator,
    options: &RenderOptions,
) -> String {
    let headers = grid.headers();

    let mut html = String::new();
    html.push_str(
        "<table border=\"1\" cellspacing=\"0\" cellpadding=\"4\" \
         style=\"border-collapse:collapse;width:100%\">",
    );

    html.push_str("<thead><tr><th>№</th>");
    for column in columns {
        html.push_str("<th>");
        html.push_str(&escape_html(&column.title));
        html.push_str("</th>");
    }
    html.push_str("</tr></thead><tbody>");

    let page_rows = pager.page_slice(grid.data_rows());
    for (offset, row) in page_rows.iter().enumerate() {
        html.push_str("<tr>");
        // Absolute position among data rows, not window-relative.
        html.push_str(&format!("<td>{}</td>", pager.start_row() + offset));

        for column in columns {
            let raw_header = headers
                .get(column.source_index)
                .map_or("", String::as_str);
            match row.get(column.source_index) {
                Some(cell) => {
                    let rendered = render_cell_value(cell, raw_header);
                    let style = cell_style_attr(cell, rendered.numeric, options);
                    html.push_str(&format!("<td{style}>{}</td>", rendered.text));
                }
                None => html.push_str("<td style=\"text-align:left;\"></td>"),
            }
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}
