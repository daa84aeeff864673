//! Minimal single-sheet XLSX writer for plain text grids

use anyhow::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

/// Write `rows` as the only sheet of a new XLSX file.
///
/// Every non-empty value is stored as an inline string; empty values leave
/// the cell out.
pub fn write_rows_xlsx<S: AsRef<str>>(
    output_path: &Path,
    sheet_name: &str,
    rows: &[Vec<S>],
) -> Result<()> {
    let file = File::create(output_path)?;
    write_package(file, sheet_name, rows)?;
    Ok(())
}

fn write_package<W: Write + Seek, S: AsRef<str>>(
    output: W,
    sheet_name: &str,
    rows: &[Vec<S>],
) -> Result<W> {
    let mut zip_writer = ZipWriter::new(output);
    let options = SimpleFileOptions::default();

    zip_writer.start_file("[Content_Types].xml", options)?;
    zip_writer.write_all(CONTENT_TYPES_XML.as_bytes())?;

    zip_writer.start_file("_rels/.rels", options)?;
    zip_writer.write_all(ROOT_RELS_XML.as_bytes())?;

    zip_writer.start_file("xl/workbook.xml", options)?;
    zip_writer.write_all(&workbook_xml(sheet_name)?)?;

    zip_writer.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip_writer.write_all(WORKBOOK_RELS_XML.as_bytes())?;

    zip_writer.start_file("xl/worksheets/sheet1.xml", options)?;
    zip_writer.write_all(&worksheet_xml(rows)?)?;

    Ok(zip_writer.finish()?)
}

fn workbook_xml(sheet_name: &str) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    writer.write_event(Event::Start(
        BytesStart::new("workbook").with_attributes([("xmlns", MAIN_NS), ("xmlns:r", REL_NS)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("sheets")))?;
    writer.write_event(Event::Empty(BytesStart::new("sheet").with_attributes([
        ("name", sheet_name),
        ("sheetId", "1"),
        ("r:id", "rId1"),
    ])))?;
    writer.write_event(Event::End(BytesEnd::new("sheets")))?;
    writer.write_event(Event::End(BytesEnd::new("workbook")))?;
    Ok(writer.into_inner().into_inner())
}

fn worksheet_xml<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
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

        for (col_idx, value) in row.iter().enumerate() {
            let value = value.as_ref();
            if value.is_empty() {
                continue;
            }
            let cell_ref = format!("{}{}", col_to_letter(col_idx as u32), row_number);
            writer.write_event(Event::Start(
                BytesStart::new("c").with_attributes([("r", cell_ref.as_str()), ("t", "inlineStr")]),
            ))?;
            writer.write_event(Event::Start(BytesStart::new("is")))?;
            writer.write_event(Event::Start(BytesStart::new("t")))?;
            writer.write_event(Event::Text(BytesText::new(value)))?;
            writer.write_event(Event::End(BytesEnd::new("t")))?;
            writer.write_event(Event::End(BytesEnd::new("is")))?;
            writer.write_event(Event::End(BytesEnd::new("c")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("row")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("sheetData")))?;
    writer.write_event(Event::End(BytesEnd::new("worksheet")))?;
    Ok(writer.into_inner().into_inner())
}

/// Convert column number to letter (0 -> A, 1 -> B, 26 -> AA)
fn col_to_letter(mut col: u32) -> String {
    let mut result = String::new();
    loop {
        result.insert(0, (b'A' + (col % 26) as u8) as char);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    result
}
