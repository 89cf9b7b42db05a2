use std::fs;

use crate::ReaderError;

/// Read a plain-text export of the statute: one paragraph per non-empty line.
pub fn read_txt_paragraphs(path: &str) -> Result<Vec<String>, ReaderError> {
    read_txt_paragraphs_with_encoding(path, None)
}

/// Read a text file with an optional explicit encoding label (any WHATWG label such as
/// "utf-8", "windows-1252", "utf-16le"). Unknown labels fall back to UTF-8 (lossy).
pub fn read_txt_paragraphs_with_encoding(path: &str, encoding: Option<&str>) -> Result<Vec<String>, ReaderError> {
    let bytes = fs::read(path).map_err(|e| ReaderError::Io { path: path.to_string(), message: e.to_string() })?;
    let text = decode(&bytes, encoding);
    Ok(split_paragraphs(&text))
}

fn decode(bytes: &[u8], encoding: Option<&str>) -> String {
    let label = encoding.unwrap_or("").trim();
    match encoding_rs::Encoding::for_label(label.as_bytes()) {
        Some(enc) => {
            // decode() sniffs a BOM first, so UTF-8/UTF-16 files with BOM decode correctly either way
            let (cow, _enc_used, _had_errors) = enc.decode(bytes);
            cow.into_owned()
        }
        None => {
            let (cow, _enc_used, _had_errors) = encoding_rs::UTF_8.decode(bytes);
            cow.into_owned()
        }
    }
}

pub(crate) fn split_paragraphs(text: &str) -> Vec<String> {
    text.replace('\r', "")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_become_paragraphs() {
        let paras = split_paragraphs("BAB I\r\nKETENTUAN UMUM\n\n  Pasal 1  \n");
        assert_eq!(paras, vec!["BAB I", "KETENTUAN UMUM", "Pasal 1"]);
    }

    #[test]
    fn windows_1252_label_is_honored() {
        let bytes = [b'P', b'a', b's', b'a', b'l', b' ', b'1', 0xE9];
        assert_eq!(decode(&bytes, Some("windows-1252")), "Pasal 1é");
        assert_eq!(decode(b"Pasal 2", None), "Pasal 2");
    }
}
