//! Structural chunking of a statute paragraph stream into (chapter, article) chunks.

use std::collections::HashMap;

use chunk_model::{article, Chunk};

use crate::classifier::{ParagraphClass, ParagraphClassifier};
use crate::explanatory::parse_explanatory_notes;
use crate::text_segmenter::{clean_text, split_long_text, TextChunkParams};

/// Which part of the document the stream is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Body,
    Explanatory,
}

#[derive(Debug)]
struct OpenArticle {
    label: String,
    key: String,
}

/// Mutable state of the body pass.
#[derive(Debug, Default)]
struct BodyState {
    chapter: Option<String>,
    article: Option<OpenArticle>,
    buffer: Vec<String>,
    chapter_title_pending: bool,
}

/// Chunker over an ordered paragraph stream, parameterized by the paragraph rules.
pub struct StatuteChunker<C: ParagraphClassifier> {
    classifier: C,
    params: TextChunkParams,
}

impl<C: ParagraphClassifier> StatuteChunker<C> {
    pub fn new(classifier: C, params: TextChunkParams) -> Self {
        Self { classifier, params }
    }

    /// Turn paragraphs into chunks. A document without article headings yields no chunks.
    pub fn chunk(&self, paragraphs: &[String]) -> Vec<Chunk> {
        let (body, explanatory) = self.split_sections(paragraphs);
        let notes = parse_explanatory_notes(&explanatory, &self.classifier);

        let mut chunks = Vec::new();
        let mut state = BodyState::default();

        for para in body {
            let trimmed = para.trim();
            match self.classifier.classify(trimmed) {
                ParagraphClass::ChapterHeading => {
                    self.close_article(&mut state, &notes, &mut chunks);
                    state.chapter = Some(trimmed.to_string());
                    state.chapter_title_pending = true;
                }
                ParagraphClass::ArticleHeading { key } => {
                    state.chapter_title_pending = false;
                    self.close_article(&mut state, &notes, &mut chunks);
                    state.article = Some(OpenArticle { label: trimmed.to_string(), key });
                }
                _ => {
                    if state.chapter_title_pending {
                        state.chapter_title_pending = false;
                        if let Some(chapter) = state.chapter.as_mut() {
                            chapter.push(' ');
                            chapter.push_str(trimmed);
                        }
                        continue;
                    }
                    // text outside any article is dropped
                    if state.article.is_some() {
                        state.buffer.push(trimmed.to_string());
                    }
                }
            }
        }
        self.close_article(&mut state, &notes, &mut chunks);
        chunks
    }

    /// Partition paragraphs into the body (first chapter heading onward) and the
    /// explanatory section. The preamble is dropped.
    fn split_sections<'a>(&self, paragraphs: &'a [String]) -> (Vec<&'a String>, Vec<String>) {
        let mut section = Section::Preamble;
        let mut body = Vec::new();
        let mut explanatory = Vec::new();
        for para in paragraphs {
            let class = self.classifier.classify(para);
            if class == ParagraphClass::ExplanatorySection {
                section = Section::Explanatory;
            }
            if section == Section::Preamble && class == ParagraphClass::ChapterHeading {
                section = Section::Body;
            }
            match section {
                Section::Preamble => {}
                Section::Body => body.push(para),
                Section::Explanatory => explanatory.push(para.clone()),
            }
        }
        (body, explanatory)
    }

    fn close_article(&self, state: &mut BodyState, notes: &HashMap<String, String>, out: &mut Vec<Chunk>) {
        let Some(open) = state.article.take() else {
            state.buffer.clear();
            return;
        };
        let buffer = std::mem::take(&mut state.buffer);
        if buffer.is_empty() {
            return;
        }
        let text = clean_text(&buffer.join(" "));
        if text.is_empty() {
            return;
        }
        let chapter = state.chapter.clone().unwrap_or_default();
        let note = notes.get(&open.key).cloned().unwrap_or_default();

        if text.chars().count() > self.params.max_chars {
            let parts = split_long_text(&text, &self.params);
            for (idx, part) in parts.into_iter().enumerate() {
                out.push(Chunk::new(
                    chapter.clone(),
                    article::part_label(&open.label, idx + 1),
                    part,
                    note.clone(),
                ));
            }
        } else {
            out.push(Chunk::new(chapter, open.label, text, note));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::StatuteRules;

    fn paras(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn chunker() -> StatuteChunker<StatuteRules> {
        StatuteChunker::new(StatuteRules::default(), TextChunkParams::default())
    }

    #[test]
    fn chapter_title_is_joined_and_articles_flushed() {
        let input = paras(&[
            "BAB I",
            "KETENTUAN UMUM",
            "Pasal 1",
            "Dalam Undang-Undang ini yang dimaksud dengan:",
            "Data Pribadi adalah data tentang orang perseorangan.",
            "BAB II",
            "ASAS",
            "Pasal 2",
            "Undang-Undang ini berlaku untuk Setiap Orang.",
        ]);
        let chunks = chunker().chunk(&input);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chapter_label, "BAB I KETENTUAN UMUM");
        assert_eq!(chunks[0].article_label, "Pasal 1");
        assert_eq!(
            chunks[0].text,
            "Dalam Undang-Undang ini yang dimaksud dengan: Data Pribadi adalah data tentang orang perseorangan."
        );
        assert_eq!(chunks[1].chapter_label, "BAB II ASAS");
        assert_eq!(chunks[1].article_label, "Pasal 2");
    }

    #[test]
    fn empty_article_yields_no_chunk() {
        let input = paras(&["BAB I", "UMUM", "Pasal 1", "Pasal 2", "isi pasal dua"]);
        let chunks = chunker().chunk(&input);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].article_label, "Pasal 2");
    }

    #[test]
    fn section_state_tracks_document_layout() {
        let input = paras(&[
            "UNDANG-UNDANG REPUBLIK INDONESIA",
            "Pasal 5 ayat (1) Undang-Undang Dasar 1945",
            "BAB I",
            "UMUM",
            "Pasal 1",
            "isi",
            "PENJELASAN ATAS UNDANG-UNDANG NOMOR 27 TAHUN 2022",
            "Pasal 1",
            "Cukup jelas.",
        ]);
        let chunks = chunker().chunk(&input);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "isi");
        assert_eq!(chunks[0].explanatory_note, "Cukup jelas.");
    }
}
