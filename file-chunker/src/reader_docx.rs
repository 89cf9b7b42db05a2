use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;

use crate::ReaderError;

fn local_name<'a>(q: &'a [u8]) -> &'a [u8] {
    match q.iter().position(|&b| b == b':') { Some(i) => &q[i + 1..], None => q }
}

fn is_page_break(e: &BytesStart<'_>) -> bool {
    for attr in e.attributes().with_checks(false).flatten() {
        if local_name(attr.key.as_ref()) == b"type" {
            return attr.value.as_ref().eq_ignore_ascii_case(b"page");
        }
    }
    false
}

/// Minimal DOCX reader: opens the zip, parses word/document.xml and returns the
/// trimmed, non-empty text of every paragraph in document order.
pub fn read_docx_paragraphs(path: &str) -> Result<Vec<String>, ReaderError> {
    let file = File::open(path).map_err(|e| ReaderError::Io { path: path.to_string(), message: e.to_string() })?;
    let mut zip = zip::ZipArchive::new(file)
        .map_err(|e| ReaderError::InvalidDocx { path: path.to_string(), message: e.to_string() })?;
    let mut doc_xml = String::new();
    {
        let mut part = zip.by_name("word/document.xml").map_err(|_| ReaderError::InvalidDocx {
            path: path.to_string(),
            message: "missing word/document.xml".into(),
        })?;
        part.read_to_string(&mut doc_xml)
            .map_err(|e| ReaderError::InvalidDocx { path: path.to_string(), message: e.to_string() })?;
    }
    parse_document_xml(&doc_xml)
        .map_err(|message| ReaderError::InvalidDocx { path: path.to_string(), message })
}

/// Paragraph extraction over the raw `word/document.xml` body.
pub(crate) fn parse_document_xml(doc_xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(doc_xml);
    reader.trim_text(false);
    let mut buf = Vec::new();

    let mut paragraphs: Vec<String> = Vec::new();
    let mut cur_text = String::new();
    let mut in_t = false;
    let mut in_p = false;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                match local_name(e.name().as_ref()) {
                    b"p" => { in_p = true; cur_text.clear(); }
                    b"t" => { in_t = true; }
                    // soft line breaks stay inside the paragraph; page breaks carry no text
                    b"br" => { if !is_page_break(&e) { cur_text.push(' '); } }
                    b"tab" => { cur_text.push(' '); }
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => {
                match local_name(e.name().as_ref()) {
                    b"br" => { if !is_page_break(&e) { cur_text.push(' '); } }
                    b"tab" => { cur_text.push(' '); }
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                match local_name(e.name().as_ref()) {
                    b"t" => { in_t = false; }
                    b"p" => {
                        if in_p {
                            let text_s = cur_text.trim();
                            if !text_s.is_empty() {
                                paragraphs.push(text_s.to_string());
                            }
                            in_p = false;
                            cur_text.clear();
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(t)) => {
                if in_t {
                    let s = t.unescape().map_err(|e| e.to_string())?;
                    cur_text.push_str(&s);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("malformed document.xml at {}: {e}", reader.buffer_position())),
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_runs_per_paragraph() {
        let xml = r#"<w:document xmlns:w="x"><w:body>
            <w:p><w:r><w:t>BAB I</w:t></w:r></w:p>
            <w:p><w:r><w:t>KETENTUAN </w:t></w:r><w:r><w:t>UMUM</w:t></w:r></w:p>
            <w:p></w:p>
            <w:p><w:r><w:t>Pasal 1</w:t></w:r><w:r><w:br w:type="page"/></w:r></w:p>
        </w:body></w:document>"#;
        let paras = parse_document_xml(xml).expect("valid xml");
        assert_eq!(paras, vec!["BAB I", "KETENTUAN UMUM", "Pasal 1"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_docx_paragraphs("does/not/exist.docx").expect_err("missing file");
        assert!(matches!(err, ReaderError::Io { .. }));
    }
}
