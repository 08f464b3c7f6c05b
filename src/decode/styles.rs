//! Stylesheet parsing - resolves cell formats into per-cell display styles.
//!
//! Only the parts the report viewer renders are extracted: solid fill
//! foregrounds, font color/bold/italic, and the number format code.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::color::{indexed_to_hex, rgb_to_hex};
use crate::grid::CellStyle;

/// One resolved `cellXfs` entry: the display style plus its format code.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResolvedXf {
    pub style: Option<CellStyle>,
    pub number_format: Option<String>,
}

/// Resolved style table indexed by a cell's `s` attribute.
#[derive(Debug, Default)]
pub(crate) struct StyleTable {
    xfs: Vec<ResolvedXf>,
}

impl StyleTable {
    /// Resolve a cell's style index; unknown indices yield an unstyled cell.
    pub fn resolve(&self, idx: u32) -> ResolvedXf {
        self.xfs.get(idx as usize).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Default, Clone)]
struct RawFont {
    color: Option<String>,
    bold: bool,
    italic: bool,
}

#[derive(Debug, Default, Clone)]
struct RawFill {
    pattern_type: Option<String>,
    fg_color: Option<String>,
}

#[derive(Debug, Default, Clone)]
struct RawXf {
    font_id: Option<u32>,
    fill_id: Option<u32>,
    num_fmt_id: Option<u32>,
}

/// Built-in number format codes reports actually use.
///
/// Custom formats start at id 164; date/time builtins are not carried
/// because the viewer never formats by them.
const fn builtin_number_format(id: u32) -> Option<&'static str> {
    match id {
        1 => Some("0"),
        2 => Some("0.00"),
        3 => Some("#,##0"),
        4 => Some("#,##0.00"),
        9 => Some("0%"),
        10 => Some("0.00%"),
        11 => Some("0.00E+00"),
        49 => Some("@"),
        _ => None,
    }
}

fn attr_color(e: &BytesStart) -> Option<String> {
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"rgb" => {
                if let Ok(raw) = std::str::from_utf8(&attr.value) {
                    return rgb_to_hex(raw);
                }
            }
            b"indexed" => {
                if let Some(idx) = std::str::from_utf8(&attr.value)
                    .ok()
                    .and_then(|s| s.parse().ok())
                {
                    return indexed_to_hex(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn attr_u32(e: &BytesStart, key: &[u8]) -> Option<u32> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return std::str::from_utf8(&attr.value).ok().and_then(|s| s.parse().ok());
        }
    }
    None
}

fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return std::str::from_utf8(&attr.value).ok().map(|s| s.to_string());
        }
    }
    None
}

/// Parse `xl/styles.xml` into a resolved style table.
///
/// A missing stylesheet is not an error - the table is empty and all cells
/// resolve unstyled.
pub(crate) fn parse_styles<R: Read + Seek>(archive: &mut ZipArchive<R>) -> StyleTable {
    let Ok(file) = archive.by_name("xl/styles.xml") else {
        return StyleTable::default();
    };

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut fonts: Vec<RawFont> = Vec::new();
    let mut fills: Vec<RawFill> = Vec::new();
    let mut raw_xfs: Vec<RawXf> = Vec::new();
    let mut num_fmts: Vec<(u32, String)> = Vec::new();

    let mut in_num_fmts = false;
    let mut in_fonts = false;
    let mut in_fills = false;
    let mut in_cell_xfs = false;
    let mut current_font: Option<RawFont> = None;
    let mut current_fill: Option<RawFill> = None;

    let mut buf = Vec::new();
    loop {
        let event = xml.read_event_into(&mut buf);
        let is_empty = matches!(&event, Ok(Event::Empty(_)));

        match event {
            Ok(Event::Start(ref e) | Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"numFmts" => in_num_fmts = true,
                b"fonts" => in_fonts = true,
                b"fills" => in_fills = true,
                b"cellXfs" => in_cell_xfs = true,
                b"numFmt" if in_num_fmts => {
                    if let (Some(id), Some(code)) =
                        (attr_u32(e, b"numFmtId"), attr_string(e, b"formatCode"))
                    {
                        num_fmts.push((id, code));
                    }
                }
                b"font" if in_fonts => {
                    current_font = Some(RawFont::default());
                    if is_empty {
                        if let Some(font) = current_font.take() {
                            fonts.push(font);
                        }
                    }
                }
                b"b" => {
                    if let Some(font) = current_font.as_mut() {
                        font.bold = true;
                    }
                }
                b"i" => {
                    if let Some(font) = current_font.as_mut() {
                        font.italic = true;
                    }
                }
                b"color" => {
                    if let Some(font) = current_font.as_mut() {
                        font.color = attr_color(e);
                    }
                }
                b"fill" if in_fills => {
                    current_fill = Some(RawFill::default());
                }
                b"patternFill" => {
                    if let Some(fill) = current_fill.as_mut() {
                        fill.pattern_type = attr_string(e, b"patternType");
                    }
                }
                b"fgColor" => {
                    if let Some(fill) = current_fill.as_mut() {
                        fill.fg_color = attr_color(e);
                    }
                }
                b"xf" if in_cell_xfs => {
                    raw_xfs.push(RawXf {
                        font_id: attr_u32(e, b"fontId"),
                        fill_id: attr_u32(e, b"fillId"),
                        num_fmt_id: attr_u32(e, b"numFmtId"),
                    });
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"numFmts" => in_num_fmts = false,
                b"fonts" => in_fonts = false,
                b"fills" => in_fills = false,
                b"cellXfs" => in_cell_xfs = false,
                b"font" => {
                    if let Some(font) = current_font.take() {
                        fonts.push(font);
                    }
                }
                b"fill" => {
                    if let Some(fill) = current_fill.take() {
                        fills.push(fill);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    let xfs = raw_xfs
        .iter()
        .map(|xf| resolve_xf(xf, &fonts, &fills, &num_fmts))
        .collect();

    StyleTable { xfs }
}

fn resolve_xf(
    xf: &RawXf,
    fonts: &[RawFont],
    fills: &[RawFill],
    num_fmts: &[(u32, String)],
) -> ResolvedXf {
    let mut style = CellStyle::default();

    if let Some(font) = xf.font_id.and_then(|id| fonts.get(id as usize)) {
        style.text_color.clone_from(&font.color);
        style.bold = font.bold;
        style.italic = font.italic;
    }

    // Only solid pattern fills carry a usable background color.
    if let Some(fill) = xf.fill_id.and_then(|id| fills.get(id as usize)) {
        if fill.pattern_type.as_deref() == Some("solid") {
            style.background_color.clone_from(&fill.fg_color);
        }
    }

    let number_format = xf.num_fmt_id.and_then(|id| {
        builtin_number_format(id)
            .map(str::to_string)
            .or_else(|| {
                num_fmts
                    .iter()
                    .find(|(fmt_id, _)| *fmt_id == id)
                    .map(|(_, code)| code.clone())
            })
    });

    ResolvedXf {
        style: if style.is_empty() { None } else { Some(style) },
        number_format,
    }
}
