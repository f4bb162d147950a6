//! Single-sheet XLSX workbook writer
//!
//! The OOXML parts are written by hand with inline strings, so no shared
//! string table is needed. Zip entries carry a fixed timestamp, which keeps
//! output byte-identical across runs.

use crate::error::{ConversionError, ConversionResult};
use crate::format::OutputFormat;
use crate::formatter::csv::Table;
use crate::model::{Number, Shape, Value};
use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

pub const SHEET_NAME: &str = "Sheet 1";

/// Largest number of significant digits a spreadsheet double keeps exactly
const MAX_NUMERIC_DIGITS: usize = 15;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="1"><fill><patternFill patternType="none"/></fill></fills><borders count="1"><border/></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs></styleSheet>"#;

/// Encode a non-empty sequence of mappings as a one-sheet workbook
pub fn encode(value: &Value) -> ConversionResult<Vec<u8>> {
    let table = Table::from_value(value, OutputFormat::Xlsx)?;
    if table.rows.is_empty() {
        return Err(ConversionError::shape(
            OutputFormat::Xlsx,
            Shape::EmptySequence,
            "a workbook needs at least one row",
        ));
    }

    let sheet = worksheet_xml(&table);
    write_package(&sheet).map_err(|e| ConversionError::encode(OutputFormat::Xlsx, e))
}

fn write_package(sheet: &str) -> zip::result::ZipResult<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/workbook.xml", workbook_xml()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/styles.xml", STYLES.to_string()),
        ("xl/worksheets/sheet1.xml", sheet.to_string()),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in parts {
        zip.start_file(name, options)?;
        zip.write_all(body.as_bytes())?;
    }
    Ok(zip.finish()?.into_inner())
}

fn workbook_xml() -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            r#"<sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#
        ),
        SHEET_NAME
    )
}

fn worksheet_xml(table: &Table<'_>) -> String {
    let mut xml = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        "\n",
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#
    ));

    xml.push_str(r#"<row r="1">"#);
    for (column, header) in table.headers.iter().enumerate() {
        xml.push_str(&inline_string_cell(&cell_ref(column, 1), header));
    }
    xml.push_str("</row>");

    for (index, row) in table.rows.iter().enumerate() {
        let row_number = index + 2;
        xml.push_str(&format!(r#"<row r="{}">"#, row_number));
        for (column, cell) in table.cells(row).enumerate() {
            if let Some(cell) = cell {
                xml.push_str(&value_cell(&cell_ref(column, row_number), cell));
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn value_cell(reference: &str, value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => format!(r#"<c r="{}" t="b"><v>{}</v></c>"#, reference, u8::from(*b)),
        Value::Number(n) if is_exact_double(n) => {
            format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n)
        }
        other => inline_string_cell(reference, &other.to_cell_text()),
    }
}

fn inline_string_cell(reference: &str, text: &str) -> String {
    format!(
        r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
        reference,
        escape(&strip_control_chars(text))
    )
}

/// Numbers a spreadsheet would round are kept as text instead
fn is_exact_double(n: &Number) -> bool {
    n.as_f64().is_some() && n.significant_digits() <= MAX_NUMERIC_DIGITS
}

/// XML 1.0 forbids most C0 control characters, even escaped
fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

/// A1-style reference for a zero-based column and one-based row
fn cell_ref(column: usize, row: usize) -> String {
    format!("{}{}", column_name(column), row)
}

fn column_name(mut column: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (column % 26) as u8);
        if column < 26 {
            break;
        }
        column = column / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}
