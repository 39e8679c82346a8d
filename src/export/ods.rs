//! Minimal OpenDocument spreadsheet writer.
//!
//! The archive layout follows ODF packaging: `mimetype` first, stored
//! uncompressed, then the manifest and the XML parts (Deflated).

use crate::errors::AppResult;
use crate::export::model::{Cell, Table};
use chrono::Local;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const ODS_MIMETYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";

const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest:manifest xmlns:manifest="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0" manifest:version="1.2">
 <manifest:file-entry manifest:full-path="/" manifest:version="1.2" manifest:media-type="application/vnd.oasis.opendocument.spreadsheet"/>
 <manifest:file-entry manifest:full-path="content.xml" manifest:media-type="text/xml"/>
 <manifest:file-entry manifest:full-path="styles.xml" manifest:media-type="text/xml"/>
 <manifest:file-entry manifest:full-path="meta.xml" manifest:media-type="text/xml"/>
</manifest:manifest>
"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-styles xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0" office:version="1.2">
 <office:styles>
  <style:default-style style:family="table-cell">
   <style:text-properties fo:font-size="10pt"/>
  </style:default-style>
 </office:styles>
</office:document-styles>
"#;

const CONTENT_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0" office:version="1.2">
 <office:automatic-styles>
  <style:style style:name="header" style:family="table-cell">
   <style:text-properties fo:font-weight="bold"/>
  </style:style>
 </office:automatic-styles>
 <office:body>
  <office:spreadsheet>
"#;

const CONTENT_CLOSE: &str = "  </office:spreadsheet>\n </office:body>\n</office:document-content>\n";

/// Render tables as an `.ods` archive, one sheet per table.
pub fn render_ods(tables: &[Table]) -> AppResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("mimetype", stored)?;
    zip.write_all(ODS_MIMETYPE.as_bytes())?;

    zip.start_file("META-INF/manifest.xml", deflated)?;
    zip.write_all(MANIFEST.as_bytes())?;

    zip.start_file("content.xml", deflated)?;
    zip.write_all(content_xml(tables).as_bytes())?;

    zip.start_file("styles.xml", deflated)?;
    zip.write_all(STYLES.as_bytes())?;

    zip.start_file("meta.xml", deflated)?;
    zip.write_all(meta_xml().as_bytes())?;

    Ok(zip.finish()?.into_inner())
}

fn meta_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-meta xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:meta="urn:oasis:names:tc:opendocument:xmlns:meta:1.0" office:version="1.2">
 <office:meta>
  <meta:generator>almoco/{}</meta:generator>
  <meta:creation-date>{}</meta:creation-date>
 </office:meta>
</office:document-meta>
"#,
        env!("CARGO_PKG_VERSION"),
        Local::now().format("%Y-%m-%dT%H:%M:%S")
    )
}

fn content_xml(tables: &[Table]) -> String {
    let mut xml = String::from(CONTENT_OPEN);

    for table in tables {
        xml.push_str(&format!(
            "   <table:table table:name=\"{}\">\n",
            escape_xml(&table.name)
        ));
        xml.push_str(&format!(
            "    <table:table-column table:number-columns-repeated=\"{}\"/>\n",
            table.headers.len().max(1)
        ));

        xml.push_str("    <table:table-row>");
        for h in &table.headers {
            xml.push_str(&format!(
                "<table:table-cell table:style-name=\"header\" office:value-type=\"string\"><text:p>{}</text:p></table:table-cell>",
                escape_xml(h)
            ));
        }
        xml.push_str("</table:table-row>\n");

        for row in &table.rows {
            xml.push_str("    <table:table-row>");
            for cell in row {
                xml.push_str(&cell_xml(cell));
            }
            xml.push_str("</table:table-row>\n");
        }

        xml.push_str("   </table:table>\n");
    }

    xml.push_str(CONTENT_CLOSE);
    xml
}

fn cell_xml(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => format!(
            "<table:table-cell office:value-type=\"string\"><text:p>{}</text:p></table:table-cell>",
            escape_xml(s)
        ),
        Cell::Number(_) => {
            let v = cell.as_text();
            format!(
                "<table:table-cell office:value-type=\"float\" office:value=\"{v}\"><text:p>{v}</text:p></table:table-cell>"
            )
        }
        Cell::Empty => "<table:table-cell/>".to_string(),
    }
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
