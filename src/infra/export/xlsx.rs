//! Minimal single-sheet xlsx writer.
//! Text is written as inline strings so no shared string table is needed.
//! Empty cells are written as empty inline strings: readers size a sheet by
//! its populated cells, and trailing blank columns would otherwise vanish.

use std::io::{Cursor, Write};

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::entities::row::{Cell, Row};

pub const SHEET_NAME: &str = "Consolidated";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="1"><fill><patternFill patternType="none"/></fill></fills><borders count="1"><border/></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs></styleSheet>"#;

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Spreadsheet column letters: 0 -> A, 25 -> Z, 26 -> AA.
pub fn column_name(mut col_idx: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (col_idx % 26) as u8);
        if col_idx < 26 {
            break;
        }
        col_idx = col_idx / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Drops characters XML 1.0 cannot carry.
fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|c| {
            matches!(*c, '\t' | '\n' | '\r')
                || (*c >= '\u{20}' && *c != '\u{FFFE}' && *c != '\u{FFFF}')
        })
        .collect()
}

pub fn encode_xlsx(rows: &[Row]) -> Result<Vec<u8>> {
    let sheet = sheet_xml(rows)?;
    let workbook = workbook_xml()?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, &[u8]); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", ROOT_RELS.as_bytes()),
        ("xl/workbook.xml", &workbook),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes()),
        ("xl/styles.xml", STYLES.as_bytes()),
        ("xl/worksheets/sheet1.xml", &sheet),
    ];
    for (name, body) in parts {
        zip.start_file(name, options)
            .with_context(|| format!("failed to start xlsx part {name}"))?;
        zip.write_all(body)
            .with_context(|| format!("failed to write xlsx part {name}"))?;
    }

    let cursor = zip.finish().context("failed to finish xlsx archive")?;
    Ok(cursor.into_inner())
}

fn workbook_xml() -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    writer.write_event(Event::Start(
        BytesStart::new("workbook").with_attributes([("xmlns", MAIN_NS), ("xmlns:r", REL_NS)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("sheets")))?;
    writer.write_event(Event::Empty(BytesStart::new("sheet").with_attributes([
        ("name", SHEET_NAME),
        ("sheetId", "1"),
        ("r:id", "rId1"),
    ])))?;
    writer.write_event(Event::End(BytesEnd::new("sheets")))?;
    writer.write_event(Event::End(BytesEnd::new("workbook")))?;
    Ok(writer.into_inner())
}

fn sheet_xml(rows: &[Row]) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    writer.write_event(Event::Start(
        BytesStart::new("worksheet").with_attributes([("xmlns", MAIN_NS)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("sheetData")))?;

    for (row_idx, row) in rows.iter().enumerate() {
        let row_number = (row_idx + 1).to_string();
        writer.write_event(Event::Start(
            BytesStart::new("row").with_attributes([("r", row_number.as_str())]),
        ))?;
        for (col_idx, cell) in row.cells().iter().enumerate() {
            let reference = format!("{}{}", column_name(col_idx), row_number);
            write_cell(&mut writer, &reference, cell)?;
        }
        writer.write_event(Event::End(BytesEnd::new("row")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("sheetData")))?;
    writer.write_event(Event::End(BytesEnd::new("worksheet")))?;
    Ok(writer.into_inner())
}

fn write_cell(writer: &mut Writer<Vec<u8>>, reference: &str, cell: &Cell) -> Result<()> {
    match cell {
        Cell::Number(value) if value.is_finite() => {
            writer.write_event(Event::Start(
                BytesStart::new("c").with_attributes([("r", reference)]),
            ))?;
            writer.write_event(Event::Start(BytesStart::new("v")))?;
            writer.write_event(Event::Text(BytesText::new(&value.to_string())))?;
            writer.write_event(Event::End(BytesEnd::new("v")))?;
            writer.write_event(Event::End(BytesEnd::new("c")))?;
        }
        other => {
            let text = xml_safe(&other.as_text());
            writer.write_event(Event::Start(
                BytesStart::new("c").with_attributes([("r", reference), ("t", "inlineStr")]),
            ))?;
            writer.write_event(Event::Start(BytesStart::new("is")))?;
            let mut t = BytesStart::new("t");
            if text.trim() != text {
                t.push_attribute(("xml:space", "preserve"));
            }
            writer.write_event(Event::Start(t))?;
            writer.write_event(Event::Text(BytesText::new(&text)))?;
            writer.write_event(Event::End(BytesEnd::new("t")))?;
            writer.write_event(Event::End(BytesEnd::new("is")))?;
            writer.write_event(Event::End(BytesEnd::new("c")))?;
        }
    }
    Ok(())
}
