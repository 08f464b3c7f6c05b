//! Test fixtures for generating report-shaped XLSX files in memory.
//!
//! The budgeting backend emits single-sheet reports: a header row followed
//! by data rows, with occasional fills, font styling, and percent number
//! formats. `ReportBuilder` produces exactly that shape so decoder and
//! viewer tests run against known bytes.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::cast_possible_truncation
)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

// ============================================================================
// Cell and style specs
// ============================================================================

/// Visual/format knobs a report cell can carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSpec {
    pub bg_color: Option<String>,
    pub font_color: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub number_format: Option<String>,
}

impl StyleSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Solid fill foreground, as the raw ARGB/RGB attribute value.
    #[must_use]
    pub fn bg_color(mut self, color: &str) -> Self {
        self.bg_color = Some(color.to_string());
        self
    }

    #[must_use]
    pub fn font_color(mut self, color: &str) -> Self {
        self.font_color = Some(color.to_string());
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    #[must_use]
    pub fn number_format(mut self, code: &str) -> Self {
        self.number_format = Some(code.to_string());
        self
    }

    fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FixtureValue {
    Text(String),
    Number(f64),
    /// No `<c>` element is written at this position at all.
    Skip,
}

/// One cell in a fixture row.
#[derive(Debug, Clone)]
pub struct CellSpec {
    pub value: FixtureValue,
    pub style: Option<StyleSpec>,
}

impl CellSpec {
    #[must_use]
    pub fn with_style(mut self, style: StyleSpec) -> Self {
        self.style = Some(style);
        self
    }
}

pub fn text(value: &str) -> CellSpec {
    CellSpec {
        value: FixtureValue::Text(value.to_string()),
        style: None,
    }
}

pub fn num(value: f64) -> CellSpec {
    CellSpec {
        value: FixtureValue::Number(value),
        style: None,
    }
}

/// A gap: the writer emits nothing for this position.
pub fn skip() -> CellSpec {
    CellSpec {
        value: FixtureValue::Skip,
        style: None,
    }
}

// ============================================================================
// Report builder
// ============================================================================

/// Builds a single-sheet report workbook: one header row plus data rows.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<CellSpec>>,
    second_sheet: bool,
}

impl ReportBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn headers(mut self, titles: &[&str]) -> Self {
        self.headers = titles.iter().map(|t| (*t).to_string()).collect();
        self
    }

    #[must_use]
    pub fn row(mut self, cells: Vec<CellSpec>) -> Self {
        self.rows.push(cells);
        self
    }

    /// Add a decoy second sheet; the decoder must ignore it.
    #[must_use]
    pub fn with_second_sheet(mut self) -> Self {
        self.second_sheet = true;
        self
    }

    /// Build the XLSX bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let sheet_count = if self.second_sheet { 2 } else { 1 };

        // Collect distinct styles (xf 0 stays the default format).
        let mut styles: Vec<StyleSpec> = Vec::new();
        let mut all_rows: Vec<Vec<CellSpec>> =
            vec![self.headers.iter().map(|h| text(h)).collect()];
        all_rows.extend(self.rows);

        for row in &all_rows {
            for cell in row {
                if let Some(style) = &cell.style {
                    if !style.is_plain() && !styles.contains(style) {
                        styles.push(style.clone());
                    }
                }
            }
        }

        // Collect shared strings.
        let mut shared: Vec<String> = Vec::new();
        for row in &all_rows {
            for cell in row {
                if let FixtureValue::Text(s) = &cell.value {
                    if !shared.contains(s) {
                        shared.push(s.clone());
                    }
                }
            }
        }

        let cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let _ = zip.start_file("[Content_Types].xml", options);
        let _ = zip.write_all(content_types(sheet_count).as_bytes());

        let _ = zip.start_file("_rels/.rels", options);
        let _ = zip.write_all(root_rels().as_bytes());

        let _ = zip.start_file("xl/workbook.xml", options);
        let _ = zip.write_all(workbook_xml(sheet_count).as_bytes());

        let _ = zip.start_file("xl/_rels/workbook.xml.rels", options);
        let _ = zip.write_all(workbook_rels(sheet_count).as_bytes());

        let _ = zip.start_file("xl/styles.xml", options);
        let _ = zip.write_all(styles_xml(&styles).as_bytes());

        if !shared.is_empty() {
            let _ = zip.start_file("xl/sharedStrings.xml", options);
            let _ = zip.write_all(shared_strings_xml(&shared).as_bytes());
        }

        let _ = zip.start_file("xl/worksheets/sheet1.xml", options);
        let _ = zip.write_all(sheet_xml(&all_rows, &shared, &styles).as_bytes());

        if self.second_sheet {
            let decoy = vec![vec![CellSpec {
                value: FixtureValue::Number(999.0),
                style: None,
            }]];
            let _ = zip.start_file("xl/worksheets/sheet2.xml", options);
            let _ = zip.write_all(sheet_xml(&decoy, &shared, &styles).as_bytes());
        }

        let cursor = zip.finish().expect("Failed to finish ZIP");
        cursor.into_inner()
    }
}

// ============================================================================
// XML part generation
// ============================================================================

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn content_types(sheet_count: usize) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#);
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn root_rels() -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    xml.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#);
    xml.push_str("</Relationships>");
    xml
}

fn workbook_xml(sheet_count: usize) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);
    xml.push_str("<sheets>");
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<sheet name="Report{i}" sheetId="{i}" r:id="rId{i}"/>"#
        ));
    }
    xml.push_str("</sheets></workbook>");
    xml
}

fn workbook_rels(sheet_count: usize) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    let mut rid = 1;
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{rid}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{i}.xml"/>"#
        ));
        rid += 1;
    }
    xml.push_str(&format!(
        r#"<Relationship Id="rId{rid}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#
    ));
    rid += 1;
    xml.push_str(&format!(
        r#"<Relationship Id="rId{rid}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#
    ));
    xml.push_str("</Relationships>");
    xml
}

fn builtin_format_id(code: &str) -> Option<u32> {
    match code {
        "0" => Some(1),
        "0.00" => Some(2),
        "#,##0" => Some(3),
        "#,##0.00" => Some(4),
        "0%" => Some(9),
        "0.00%" => Some(10),
        "@" => Some(49),
        _ => None,
    }
}

fn styles_xml(styles: &[StyleSpec]) -> String {
    // Custom number formats get ids from 164 up.
    let mut custom_fmts: Vec<(u32, String)> = Vec::new();
    for style in styles {
        if let Some(code) = &style.number_format {
            if builtin_format_id(code).is_none()
                && !custom_fmts.iter().any(|(_, c)| c == code)
            {
                custom_fmts.push((164 + custom_fmts.len() as u32, code.clone()));
            }
        }
    }

    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );

    if !custom_fmts.is_empty() {
        xml.push_str(&format!(r#"<numFmts count="{}">"#, custom_fmts.len()));
        for (id, code) in &custom_fmts {
            xml.push_str(&format!(
                r#"<numFmt numFmtId="{id}" formatCode="{}"/>"#,
                escape_xml(code)
            ));
        }
        xml.push_str("</numFmts>");
    }

    // Font 0 is the default; one font per styled entry keeps ids simple.
    xml.push_str(&format!(r#"<fonts count="{}">"#, styles.len() + 1));
    xml.push_str(r#"<font><sz val="11"/><name val="Calibri"/></font>"#);
    for style in styles {
        xml.push_str("<font>");
        if style.bold {
            xml.push_str("<b/>");
        }
        if style.italic {
            xml.push_str("<i/>");
        }
        if let Some(color) = &style.font_color {
            xml.push_str(&format!(r#"<color rgb="{color}"/>"#));
        }
        xml.push_str(r#"<sz val="11"/><name val="Calibri"/></font>"#);
    }
    xml.push_str("</fonts>");

    // Fills 0/1 are the mandatory none/gray125 pair.
    xml.push_str(&format!(r#"<fills count="{}">"#, styles.len() + 2));
    xml.push_str(r#"<fill><patternFill patternType="none"/></fill>"#);
    xml.push_str(r#"<fill><patternFill patternType="gray125"/></fill>"#);
    for style in styles {
        match &style.bg_color {
            Some(color) => xml.push_str(&format!(
                r#"<fill><patternFill patternType="solid"><fgColor rgb="{color}"/></patternFill></fill>"#
            )),
            None => xml.push_str(r#"<fill><patternFill patternType="none"/></fill>"#),
        }
    }
    xml.push_str("</fills>");

    xml.push_str(r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#);
    xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);

    xml.push_str(&format!(r#"<cellXfs count="{}">"#, styles.len() + 1));
    xml.push_str(r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>"#);
    for (i, style) in styles.iter().enumerate() {
        let num_fmt_id = style
            .number_format
            .as_deref()
            .map(|code| {
                builtin_format_id(code).unwrap_or_else(|| {
                    custom_fmts
                        .iter()
                        .find(|(_, c)| c == code)
                        .map(|(id, _)| *id)
                        .unwrap_or(0)
                })
            })
            .unwrap_or(0);
        xml.push_str(&format!(
            r#"<xf numFmtId="{num_fmt_id}" fontId="{}" fillId="{}" borderId="0" applyNumberFormat="1" applyFont="1" applyFill="1"/>"#,
            i + 1,
            i + 2
        ));
    }
    xml.push_str("</cellXfs>");

    xml.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);
    xml.push_str("</styleSheet>");
    xml
}

fn shared_strings_xml(strings: &[String]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(&format!(
        r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{}" uniqueCount="{}">"#,
        strings.len(),
        strings.len()
    ));
    for s in strings {
        xml.push_str(&format!(
            r#"<si><t xml:space="preserve">{}</t></si>"#,
            escape_xml(s)
        ));
    }
    xml.push_str("</sst>");
    xml
}

/// Convert a 0-indexed column to its letter form.
fn col_letter(col: usize) -> String {
    let mut out = String::new();
    let mut n = col + 1;
    while n > 0 {
        n -= 1;
        out.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    out
}

fn sheet_xml(rows: &[Vec<CellSpec>], shared: &[String], styles: &[StyleSpec]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    xml.push_str("<sheetData>");

    for (row_idx, row) in rows.iter().enumerate() {
        xml.push_str(&format!(r#"<row r="{}">"#, row_idx + 1));
        for (col_idx, cell) in row.iter().enumerate() {
            if cell.value == FixtureValue::Skip {
                continue;
            }

            let cell_ref = format!("{}{}", col_letter(col_idx), row_idx + 1);
            let mut attrs = format!(r#"r="{cell_ref}""#);
            if let Some(style) = &cell.style {
                if let Some(pos) = styles.iter().position(|s| s == style) {
                    attrs.push_str(&format!(r#" s="{}""#, pos + 1));
                }
            }

            match &cell.value {
                FixtureValue::Text(s) => {
                    let idx = shared.iter().position(|x| x == s).unwrap_or(0);
                    xml.push_str(&format!(r#"<c {attrs} t="s"><v>{idx}</v></c>"#));
                }
                FixtureValue::Number(n) => {
                    xml.push_str(&format!(r#"<c {attrs}><v>{n}</v></c>"#));
                }
                FixtureValue::Skip => {}
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

// ============================================================================
// Convenience fixtures
// ============================================================================

/// A small plan-fact style report: org/date/amount columns, three rows.
#[must_use]
pub fn sample_report() -> Vec<u8> {
    ReportBuilder::new()
        .headers(&["org", "Date", "plan_amount"])
        .row(vec![text("Київська філія"), text("15/3/2024"), num(1500.0)])
        .row(vec![text("Львівська філія"), text("16/3/2024"), num(25000.75)])
        .row(vec![text("Одеська філія"), text("17/3/2024"), num(0.005)])
        .build()
}
