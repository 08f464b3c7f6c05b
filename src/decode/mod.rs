//! Report spreadsheet decoder.
//!
//! Reads the ZIP-packaged workbook the budgeting backend produces and
//! normalizes its first worksheet into a [`Grid`]. Later worksheets are
//! ignored - report files carry one sheet, and the viewer only ever shows
//! the first (documented limitation, not a bug).

mod styles;
mod worksheet;

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{BufReader, Cursor, Read, Seek};
use zip::ZipArchive;

use crate::error::{PlanviewError, Result};
use crate::grid::Grid;

use styles::parse_styles;
use worksheet::parse_worksheet;

/// Decode an XLSX report buffer into a normalized grid.
///
/// # Errors
///
/// Fails when the buffer is not a well-formed spreadsheet archive or the
/// workbook declares no worksheets. This call is proportional to file size;
/// browser hosts await it behind a loading state (see `ReportViewer`).
pub fn decode(data: &[u8]) -> Result<Grid> {
    let cursor = Cursor::new(data);
    let mut archive = ZipArchive::new(cursor)?;

    let shared_strings = parse_shared_strings(&mut archive);
    let styles = parse_styles(&mut archive);
    let sheet_path = first_sheet_path(&mut archive)?;

    parse_worksheet(&mut archive, &sheet_path, &shared_strings, &styles)
}

/// Resolve the archive path of the workbook's first worksheet.
///
/// Follows workbook.xml sheet order through the workbook relationships;
/// falls back to the conventional `sheet1.xml` path when the rels part is
/// missing (some writers omit it).
fn first_sheet_path<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String> {
    let first_rel_id = first_sheet_rel_id(archive)?;

    let target = first_rel_id
        .and_then(|rid| worksheet_rel_target(archive, &rid))
        .unwrap_or_else(|| "worksheets/sheet1.xml".to_string());

    // Rels targets are relative to xl/ unless rooted.
    let path = target
        .strip_prefix('/')
        .map_or_else(|| format!("xl/{target}"), str::to_string);

    if archive.by_name(&path).is_err() {
        return Err(PlanviewError::NoWorksheet);
    }
    Ok(path)
}

/// Read workbook.xml and return the first sheet's relationship id.
fn first_sheet_rel_id<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Option<String>> {
    let file = archive
        .by_name("xl/workbook.xml")
        .map_err(|_| PlanviewError::NoWorksheet)?;

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut buf = Vec::new();
    let mut saw_sheet = false;
    let mut rel_id = None;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e) | Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"sheet" && !saw_sheet {
                    saw_sheet = true;
                    for attr in e.attributes().flatten() {
                        if attr.key.local_name().as_ref() == b"id" {
                            rel_id = std::str::from_utf8(&attr.value).ok().map(str::to_string);
                        }
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_sheet {
        return Err(PlanviewError::NoWorksheet);
    }
    Ok(rel_id)
}

/// Map a relationship id to its worksheet target via workbook.xml.rels.
fn worksheet_rel_target<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    rel_id: &str,
) -> Option<String> {
    let file = archive.by_name("xl/_rels/workbook.xml.rels").ok()?;

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut buf = Vec::new();
    let mut target = None;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e) | Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let mut id = None;
                    let mut found_target = None;
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => {
                                id = std::str::from_utf8(&attr.value).ok().map(str::to_string);
                            }
                            b"Target" => {
                                found_target =
                                    std::str::from_utf8(&attr.value).ok().map(str::to_string);
                            }
                            _ => {}
                        }
                    }
                    if id.as_deref() == Some(rel_id) {
                        target = found_target;
                        break;
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    target
}

/// Parse xl/sharedStrings.xml into an ordered string list.
///
/// Missing part means the sheet has no shared strings; that is fine.
fn parse_shared_strings<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Vec<String> {
    let mut strings = Vec::new();

    let Ok(file) = archive.by_name("xl/sharedStrings.xml") else {
        return strings;
    };

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"t" if in_si => in_t = true,
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_t => {
                if let Ok(text) = e.unescape() {
                    current.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(current.clone());
                    in_si = false;
                }
                b"t" => in_t = false,
                _ => {}
            },
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    strings
}
