use chunk_model::article;
use file_chunker::text_segmenter::{clean_text, split_long_text, TextChunkParams};
use file_chunker::{chunk_paragraphs, chunk_statute_file, read_chunks_csv, write_chunks_csv};

fn paras(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn long_body(sentences: usize) -> String {
    (0..sentences)
        .map(|i| format!("Pengendali Data Pribadi wajib melaksanakan kewajiban nomor {i} secara patut;"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn document_without_article_headings_yields_no_chunks() {
    let input = paras(&["BAB I", "KETENTUAN UMUM", "Teks tanpa pasal.", "BAB II", "ASAS"]);
    let chunks = chunk_paragraphs(&input, &TextChunkParams::default());
    assert!(chunks.is_empty());
}

#[test]
fn split_parts_rebuild_the_body_and_respect_the_limit() {
    let params = TextChunkParams::default();
    let body = long_body(40);
    assert!(body.chars().count() > params.max_chars);

    let parts = split_long_text(&body, &params);
    assert!(parts.len() > 1);
    for part in &parts {
        assert!(part.chars().count() <= params.max_chars, "part too long: {}", part.chars().count());
    }
    assert_eq!(clean_text(&parts.join(" ")), clean_text(&body));
}

#[test]
fn long_article_is_split_into_numbered_parts_sharing_the_note() {
    let body = long_body(40);
    let input = paras(&[
        "BAB IV",
        "HAK SUBJEK DATA PRIBADI",
        "Pasal 5",
        body.as_str(),
        "PENJELASAN ATAS UNDANG-UNDANG REPUBLIK INDONESIA",
        "Pasal 5",
        "Yang dimaksud dengan kewajiban adalah ...",
    ]);
    let chunks = chunk_paragraphs(&input, &TextChunkParams::default());
    assert!(chunks.len() > 1);
    for (idx, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.article_label, article::part_label("Pasal 5", idx + 1));
        assert_eq!(chunk.chapter_label, "BAB IV HAK SUBJEK DATA PRIBADI");
        assert_eq!(chunk.explanatory_note, "Yang dimaksud dengan kewajiban adalah ...");
        assert_eq!(chunk.article_root(), "Pasal 5");
    }
    let rebuilt = chunks.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join(" ");
    assert_eq!(rebuilt, clean_text(&body));
}

#[test]
fn chapter_heading_followed_by_article_keeps_bare_label() {
    let input = paras(&["BAB III", "Pasal 4", "Data Pribadi terdiri atas:", "a. spesifik; dan", "b. umum."]);
    let chunks = chunk_paragraphs(&input, &TextChunkParams::default());
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].chapter_label, "BAB III");
    assert_eq!(chunks[0].text, "Data Pribadi terdiri atas: a. spesifik; dan b. umum.");
}

#[test]
fn trailing_article_is_flushed_at_end_of_input() {
    let input = paras(&["BAB I", "UMUM", "Pasal 1", "satu", "Pasal 2", "dua"]);
    let chunks = chunk_paragraphs(&input, &TextChunkParams::default());
    let labels: Vec<_> = chunks.iter().map(|c| c.article_label.as_str()).collect();
    assert_eq!(labels, vec!["Pasal 1", "Pasal 2"]);
    assert_eq!(chunks[1].text, "dua");
}

#[test]
fn preamble_citations_do_not_open_articles() {
    let input = paras(&[
        "Mengingat:",
        "Pasal 5 ayat (1), Pasal 20, dan Pasal 28G Undang-Undang Dasar",
        "teks pembukaan",
        "BAB I",
        "KETENTUAN UMUM",
        "Pasal 1",
        "isi pasal satu",
    ]);
    let chunks = chunk_paragraphs(&input, &TextChunkParams::default());
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].article_label, "Pasal 1");
}

#[test]
fn text_file_is_chunked_and_exported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("uupdp.txt");
    std::fs::write(
        &source,
        "UNDANG-UNDANG REPUBLIK INDONESIA\nBAB I\nKETENTUAN UMUM\nPasal 1\nisi\n\nPENJELASAN ATAS UNDANG-UNDANG\nPasal 1\nCukup jelas.\n",
    )
    .expect("write source");

    let out = chunk_statute_file(source.to_str().expect("utf-8 path"), &TextChunkParams::default())
        .expect("chunking succeeds");
    assert_eq!(out.source.reader_backend, "txt");
    assert_eq!(out.source.chunk_count, 1);
    assert_eq!(out.chunks[0].explanatory_note, "Cukup jelas.");

    let csv_path = dir.path().join("chunks.csv");
    let csv_path = csv_path.to_str().expect("utf-8 path");
    write_chunks_csv(csv_path, &out.chunks).expect("export");
    assert_eq!(read_chunks_csv(csv_path).expect("import"), out.chunks);
}

#[test]
fn unbroken_run_is_cut_on_char_boundaries_without_exceeding_the_limit() {
    let params = TextChunkParams::default();
    let run = "x".repeat(2500);
    let chunks = chunk_paragraphs(&paras(&["BAB I", "Pasal 1", run.as_str()]), &params);

    let lens: Vec<usize> = chunks.iter().map(|c| c.text.chars().count()).collect();
    assert_eq!(lens, vec![1000, 1000, 500]);
    // no whitespace to split on: parts concatenate back without a separator
    let glued: String = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(glued, run);
    // a space-joined rebuild gains one space per cut
    let joined = chunks.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join(" ");
    assert_eq!(joined.chars().count(), 2502);
}
