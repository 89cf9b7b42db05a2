//! Shared models used across crates

pub mod article;

use serde::{Deserialize, Serialize};

/// One labeled slice of statute text produced by the structural chunker.
///
/// Articles longer than the split threshold are emitted as several chunks whose
/// `article_label` carries a `(Part k)` suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Enclosing chapter heading plus its title line (e.g. "BAB I KETENTUAN UMUM").
    pub chapter_label: String,
    /// Article heading, suffixed with `(Part k)` when the article was split.
    pub article_label: String,
    /// Whitespace-normalized body text.
    pub text: String,
    /// Explanatory note for the article; empty when the statute has none.
    #[serde(default)]
    pub explanatory_note: String,
}

impl Chunk {
    pub fn new(
        chapter_label: impl Into<String>,
        article_label: impl Into<String>,
        text: impl Into<String>,
        explanatory_note: impl Into<String>,
    ) -> Self {
        Self {
            chapter_label: chapter_label.into(),
            article_label: article_label.into(),
            text: text.into(),
            explanatory_note: explanatory_note.into(),
        }
    }

    /// Canonical article identifier with any part suffix removed.
    pub fn article_root(&self) -> String {
        article::article_root(&self.article_label)
    }
}

/// A whole article regrouped from its chunks; the unit that gets embedded and retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDocument {
    pub article_root: String,
    pub combined_text: String,
    pub chapter_label: String,
    pub article_label: String,
    pub explanatory_note: String,
}

impl ArticleDocument {
    /// Text sent to the embedder and stored as the document body.
    ///
    /// The root is repeated in front of the label so the article number is
    /// reachable from the text itself, not only from metadata.
    pub fn document_text(&self) -> String {
        format!("{} - {}\n{}", self.article_root, self.article_label, self.combined_text)
    }

    pub fn metadata(&self) -> ArticleMeta {
        ArticleMeta {
            chapter_label: self.chapter_label.clone(),
            article_label: self.article_label.clone(),
            article_root: self.article_root.clone(),
            explanatory_note: self.explanatory_note.clone(),
        }
    }
}

/// Metadata stored next to each indexed article and returned with query results.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArticleMeta {
    #[serde(default)]
    pub chapter_label: String,
    #[serde(default)]
    pub article_label: String,
    #[serde(default)]
    pub article_root: String,
    #[serde(default)]
    pub explanatory_note: String,
}

impl ArticleMeta {
    pub const CHAPTER_LABEL: &'static str = "chapter_label";
    pub const ARTICLE_LABEL: &'static str = "article_label";
    pub const ARTICLE_ROOT: &'static str = "article_root";
    pub const EXPLANATORY_NOTE: &'static str = "explanatory_note";

    /// Field value by its stored key name.
    pub fn field(&self, key: &str) -> Option<&str> {
        match key {
            Self::CHAPTER_LABEL => Some(&self.chapter_label),
            Self::ARTICLE_LABEL => Some(&self.article_label),
            Self::ARTICLE_ROOT => Some(&self.article_root),
            Self::EXPLANATORY_NOTE => Some(&self.explanatory_note),
            _ => None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Lenient decode: unknown or missing keys fall back to empty strings.
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }
}

/// An article document ready for upsert: stable id, embedded text, vector and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedRecord {
    pub id: String,
    pub document: String,
    pub embedding: Vec<f32>,
    pub meta: ArticleMeta,
}

/// One (document text, metadata) pair returned by a vector-index query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedArticle {
    pub document: String,
    pub meta: ArticleMeta,
}

impl RetrievedArticle {
    pub fn new(document: impl Into<String>, meta: ArticleMeta) -> Self {
        Self { document: document.into(), meta }
    }

    pub fn is_blank(&self) -> bool {
        self.document.trim().is_empty()
    }
}

/// A display-ready source reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub chapter_label: String,
    pub article_label: String,
}

impl Citation {
    pub fn new(chapter_label: impl Into<String>, article_label: impl Into<String>) -> Self {
        Self { chapter_label: chapter_label.into(), article_label: article_label.into() }
    }
}

/// What the core hands to presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<Citation>,
}
