//! Paragraph classification for statute documents.
//!
//! The chunking state machine only sees [`ParagraphClass`] values, so a different
//! source-document format can be supported by another [`ParagraphClassifier`].

use std::sync::LazyLock;

use chunk_model::article;
use regex::Regex;

/// What a single paragraph means to the chunker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParagraphClass {
    /// Bare chapter heading line, e.g. `BAB IV`.
    ChapterHeading,
    /// Article heading; `key` is the canonical identifier used for note lookup.
    ArticleHeading { key: String },
    /// Start of the trailing explanatory section.
    ExplanatorySection,
    /// "Sufficiently clear" marker used inside the explanatory section.
    SufficientlyClear,
    Text,
}

pub trait ParagraphClassifier {
    fn classify(&self, paragraph: &str) -> ParagraphClass;
    /// Note text contributed by a [`ParagraphClass::SufficientlyClear`] paragraph.
    fn sufficiently_clear_note(&self) -> &str;
}

static CHAPTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^BAB\s+[IVXLCDM]+$").expect("chapter heading regex is valid")
});

static ARTICLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Pasal\s+(\d+)").expect("article heading regex is valid")
});

/// Layout rules of an Indonesian statute (*Undang-Undang*).
#[derive(Debug, Clone)]
pub struct StatuteRules {
    pub explanatory_marker: String,
    pub sufficiently_clear_marker: String,
    pub sufficiently_clear_note: String,
}

impl Default for StatuteRules {
    fn default() -> Self {
        Self {
            explanatory_marker: "PENJELASAN ATAS UNDANG-UNDANG".into(),
            sufficiently_clear_marker: "Cukup jelas".into(),
            sufficiently_clear_note: "Cukup jelas.".into(),
        }
    }
}

impl ParagraphClassifier for StatuteRules {
    fn classify(&self, paragraph: &str) -> ParagraphClass {
        let p = paragraph.trim();
        if p.contains(&self.explanatory_marker) {
            return ParagraphClass::ExplanatorySection;
        }
        if CHAPTER_RE.is_match(p) {
            return ParagraphClass::ChapterHeading;
        }
        if let Some(caps) = ARTICLE_RE.captures(p) {
            // Overlong digit runs cannot name a real article; treat them as text.
            if let Ok(n) = caps[1].parse::<u32>() {
                return ParagraphClass::ArticleHeading { key: article::article_key(n) };
            }
        }
        if p.contains(&self.sufficiently_clear_marker) {
            return ParagraphClass::SufficientlyClear;
        }
        ParagraphClass::Text
    }

    fn sufficiently_clear_note(&self) -> &str {
        &self.sufficiently_clear_note
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_statute_layout() {
        let rules = StatuteRules::default();
        assert_eq!(rules.classify("BAB XII"), ParagraphClass::ChapterHeading);
        assert_eq!(rules.classify("BAB I KETENTUAN UMUM"), ParagraphClass::Text);
        assert_eq!(rules.classify("Pasal 07"), ParagraphClass::ArticleHeading { key: "Pasal 7".into() });
        assert_eq!(rules.classify("Pasal"), ParagraphClass::Text);
        assert_eq!(
            rules.classify("PENJELASAN ATAS UNDANG-UNDANG REPUBLIK INDONESIA NOMOR 27 TAHUN 2022"),
            ParagraphClass::ExplanatorySection
        );
        assert_eq!(rules.classify("Cukup jelas."), ParagraphClass::SufficientlyClear);
        assert_eq!(rules.classify("Setiap Orang berhak."), ParagraphClass::Text);
    }
}
