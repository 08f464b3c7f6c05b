//! Worksheet parsing - turns the first sheet's XML into a rectangular grid.
//!
//! Cells are placed by their declared reference, so sparse rows and skipped
//! cells never shift later columns out of alignment with the header.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref::parse_cell_ref_bytes;
use crate::error::{PlanviewError, Result};
use crate::grid::{Cell, CellValue, Grid};

use super::styles::StyleTable;

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone)]
enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Default,
}

fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"str" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        _ => CellTypeTag::Default,
    }
}

/// Resolve the raw `<v>`/`<is>` text into a typed cell value.
fn resolve_cell_value(
    raw_value: Option<&str>,
    tag: CellTypeTag,
    shared_strings: &[String],
) -> CellValue {
    match tag {
        CellTypeTag::Shared => {
            let idx: usize = raw_value.and_then(|v| v.parse().ok()).unwrap_or(0);
            shared_strings
                .get(idx)
                .map_or(CellValue::Empty, |s| CellValue::Text(s.clone()))
        }
        CellTypeTag::Str | CellTypeTag::Inline => {
            raw_value.map_or(CellValue::Empty, |v| CellValue::Text(v.to_string()))
        }
        CellTypeTag::Bool => match raw_value {
            Some("1" | "true") => CellValue::Text("TRUE".to_string()),
            Some("0" | "false") => CellValue::Text("FALSE".to_string()),
            Some(other) => CellValue::Text(other.to_string()),
            None => CellValue::Empty,
        },
        CellTypeTag::Error => {
            raw_value.map_or(CellValue::Empty, |v| CellValue::Text(v.to_string()))
        }
        CellTypeTag::Default => match raw_value {
            Some(v) => v
                .parse::<f64>()
                .map_or_else(|_| CellValue::Text(v.to_string()), CellValue::Number),
            None => CellValue::Empty,
        },
    }
}

/// Place a cell at (row, col), growing the grid with empty cells as needed.
fn place_cell(rows: &mut Vec<Vec<Cell>>, row: usize, col: usize, cell: Cell) {
    while rows.len() <= row {
        rows.push(Vec::new());
    }
    if let Some(row_cells) = rows.get_mut(row) {
        while row_cells.len() <= col {
            row_cells.push(Cell::empty());
        }
        if let Some(slot) = row_cells.get_mut(col) {
            *slot = cell;
        }
    }
}

/// Parse one worksheet into a normalized `Grid`.
pub(crate) fn parse_worksheet<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
    shared_strings: &[String],
    styles: &StyleTable,
) -> Result<Grid> {
    let file = archive
        .by_name(path)
        .map_err(|_| PlanviewError::NoWorksheet)?;

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut rows: Vec<Vec<Cell>> = Vec::new();

    let mut buf = Vec::new();
    let mut cell_buf = Vec::new();

    loop {
        let event = xml.read_event_into(&mut buf);
        let is_empty_element = matches!(&event, Ok(Event::Empty(_)));

        match event {
            Ok(Event::Start(ref e) | Event::Empty(ref e)) if e.local_name().as_ref() == b"c" => {
                let mut cell_pos: Option<(u32, u32)> = None;
                let mut tag = CellTypeTag::Default;
                let mut style_idx: Option<u32> = None;

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"r" => cell_pos = parse_cell_ref_bytes(&attr.value),
                        b"t" => tag = parse_cell_type_tag(&attr.value),
                        b"s" => {
                            style_idx = std::str::from_utf8(&attr.value)
                                .ok()
                                .and_then(|s| s.parse().ok());
                        }
                        _ => {}
                    }
                }

                // Read the cell body (only Start events have children).
                let mut raw_value: Option<String> = None;
                if !is_empty_element {
                    let mut in_value = false;
                    loop {
                        cell_buf.clear();
                        match xml.read_event_into(&mut cell_buf) {
                            Ok(Event::Start(ref inner)) => {
                                let name = inner.local_name();
                                if matches!(name.as_ref(), b"v" | b"t") {
                                    in_value = true;
                                }
                            }
                            Ok(Event::Text(ref text)) if in_value => {
                                if let Ok(unescaped) = text.unescape() {
                                    raw_value
                                        .get_or_insert_with(String::new)
                                        .push_str(&unescaped);
                                }
                            }
                            Ok(Event::End(ref inner)) => {
                                let name = inner.local_name();
                                if matches!(name.as_ref(), b"v" | b"t") {
                                    in_value = false;
                                } else if name.as_ref() == b"c" {
                                    break;
                                }
                            }
                            Ok(Event::Eof) | Err(_) => break,
                            _ => {}
                        }
                    }
                }

                // Cells without a declared reference cannot be placed.
                if let Some((col, row)) = cell_pos {
                    let resolved = style_idx.map(|idx| styles.resolve(idx)).unwrap_or_default();
                    let cell = Cell {
                        value: resolve_cell_value(raw_value.as_deref(), tag, shared_strings),
                        style: resolved.style,
                        number_format: resolved.number_format,
                    };
                    place_cell(&mut rows, row as usize, col as usize, cell);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    // Pad every row to the sheet's full extent so column indices stay
    // aligned with the header row.
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        while row.len() < width {
            row.push(Cell::empty());
        }
    }

    Ok(Grid { rows })
}
