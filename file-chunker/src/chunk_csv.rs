//! CSV export of chunks, the intermediate artifact between chunking and indexing.

use std::fs::File;
use std::io::{BufWriter, Write};

use chunk_model::Chunk;
use thiserror::Error;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("io error on {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },
    #[error("csv error on {path}: {source}")]
    Csv { path: String, #[source] source: csv::Error },
}

/// Write chunks with a header row, UTF-8 with BOM so spreadsheet tools detect the encoding.
pub fn write_chunks_csv(path: &str, chunks: &[Chunk]) -> Result<(), CsvError> {
    let io_err = |source| CsvError::Io { path: path.to_string(), source };
    let csv_err = |source| CsvError::Csv { path: path.to_string(), source };

    let mut file = BufWriter::new(File::create(path).map_err(io_err)?);
    file.write_all(UTF8_BOM).map_err(io_err)?;
    let mut writer = csv::Writer::from_writer(file);
    for chunk in chunks {
        writer.serialize(chunk).map_err(csv_err)?;
    }
    writer.flush().map_err(io_err)?;
    Ok(())
}

pub fn read_chunks_csv(path: &str) -> Result<Vec<Chunk>, CsvError> {
    let bytes = std::fs::read(path).map_err(|source| CsvError::Io { path: path.to_string(), source })?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    let mut reader = csv::Reader::from_reader(body);
    reader
        .deserialize::<Chunk>()
        .map(|row| row.map_err(|source| CsvError::Csv { path: path.to_string(), source }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_starts_with_bom_and_header() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("chunks.csv");
        let path = path.to_str().expect("utf-8 path");
        let chunks = vec![Chunk::new("BAB I UMUM", "Pasal 1", "isi, dengan koma", "")];
        write_chunks_csv(path, &chunks).expect("write");

        let raw = std::fs::read(path).expect("read back");
        assert!(raw.starts_with(UTF8_BOM));
        let text = String::from_utf8_lossy(&raw[UTF8_BOM.len()..]).to_string();
        assert!(text.starts_with("chapter_label,article_label,text,explanatory_note"));

        assert_eq!(read_chunks_csv(path).expect("read"), chunks);
    }

    #[test]
    fn missing_note_column_defaults_to_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("legacy.csv");
        std::fs::write(&path, "chapter_label,article_label,text\nBAB II,Pasal 3,isi\n").expect("write");
        let chunks = read_chunks_csv(path.to_str().expect("utf-8 path")).expect("read");
        assert_eq!(chunks, vec![Chunk::new("BAB II", "Pasal 3", "isi", "")]);
    }
}
