//! Two-tier retrieval: metadata-filtered lookup of a named article, then unfiltered fallback.

use std::sync::LazyLock;

use chunk_model::{article, ArticleMeta, RetrievedArticle};
use chunking_store::{ArticleSearcher, MetaFilter};
use embedding_provider::embedder::Embedder;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::ServiceError;

static QUESTION_ARTICLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)pasal\s*(\d+)").expect("question article regex is valid")
});

/// Article number named in a free-text question ("pasal 5", "Pasal12"), if any.
pub fn extract_article_number(question: &str) -> Option<u32> {
    QUESTION_ARTICLE_RE
        .captures(question)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Which query produced the final result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalPath {
    Targeted,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Retrieval {
    pub articles: Vec<RetrievedArticle>,
    pub path: RetrievalPath,
    pub article_number: Option<u32>,
}

impl Retrieval {
    pub fn documents(&self) -> Vec<&str> {
        self.articles.iter().map(|a| a.document.as_str()).collect()
    }

    pub fn metadatas(&self) -> Vec<&ArticleMeta> {
        self.articles.iter().map(|a| &a.meta).collect()
    }
}

enum State {
    Start,
    TargetedLookup(u32),
    Fallback,
    Done(Vec<RetrievedArticle>, RetrievalPath),
}

#[derive(Debug, Clone, Copy)]
pub struct Retriever {
    pub top_k: usize,
}

impl Retriever {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// Run the lookup state machine. The question is embedded once for both queries.
    pub fn retrieve(
        &self,
        embedder: &dyn Embedder,
        index: &dyn ArticleSearcher,
        question: &str,
    ) -> Result<Retrieval, ServiceError> {
        let article_number = extract_article_number(question);
        let query = embedder.embed(question)?;

        let mut state = State::Start;
        let (articles, path) = loop {
            state = match state {
                State::Start => match article_number {
                    Some(n) => State::TargetedLookup(n),
                    None => State::Fallback,
                },
                State::TargetedLookup(n) => {
                    let root = article::article_key(n);
                    info!(filter = %root, "using article_root filter");
                    let filter = MetaFilter::eq(ArticleMeta::ARTICLE_ROOT, root);
                    let hits = index.query(&query, self.top_k, Some(&filter))?;
                    if hits.iter().any(|h| !h.is_blank()) {
                        State::Done(hits, RetrievalPath::Targeted)
                    } else {
                        warn!(returned = hits.len(), "targeted lookup empty; falling back to unfiltered search");
                        State::Fallback
                    }
                }
                State::Fallback => {
                    let hits = index.query(&query, self.top_k.saturating_mul(2), None)?;
                    State::Done(hits, RetrievalPath::Fallback)
                }
                State::Done(hits, path) => break (hits, path),
            };
        };

        for a in &articles {
            let preview: String = a.document.chars().take(200).collect();
            debug!(%preview, "retrieved");
        }
        info!(path = ?path, results = articles.len(), "retrieval finished");
        Ok(Retrieval { articles, path, article_number })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_number_is_case_insensitive_and_spacing_tolerant() {
        assert_eq!(extract_article_number("Apa isi PASAL 5?"), Some(5));
        assert_eq!(extract_article_number("jelaskan pasal12 ayat 2"), Some(12));
        assert_eq!(extract_article_number("Apa itu data pribadi?"), None);
    }
}
