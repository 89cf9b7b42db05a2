use std::collections::{BTreeMap, HashSet};

use chunk_model::{article, ArticleMeta, Citation};

pub const UNKNOWN_CHAPTER: &str = "Bab Tidak Diketahui";

/// Rank for article labels without a number; sorts after every real article.
pub const UNPARSEABLE_ARTICLE_RANK: u32 = u32::MAX;

/// Group citations by chapter (chapters in lexicographic order), sort each chapter's
/// articles by number, strip part suffixes and drop duplicates.
pub fn format_sources<'a, I>(metas: I) -> Vec<Citation>
where
    I: IntoIterator<Item = &'a ArticleMeta>,
{
    let mut grouped: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for meta in metas {
        let chapter = if meta.chapter_label.trim().is_empty() {
            UNKNOWN_CHAPTER.to_string()
        } else {
            meta.chapter_label.clone()
        };
        grouped.entry(chapter).or_default().push(meta.article_label.as_str());
    }

    let mut out = Vec::new();
    for (chapter, mut labels) in grouped {
        // stable, so equal ranks keep retrieval order
        labels.sort_by_key(|label| article::article_number(label).unwrap_or(UNPARSEABLE_ARTICLE_RANK));
        let mut seen: HashSet<String> = HashSet::new();
        for label in labels {
            let clean = article::strip_part_suffix(label);
            if seen.insert(clean.clone()) {
                out.push(Citation::new(chapter.clone(), clean));
            }
        }
    }
    out
}

/// Plain-text rendering for terminals: one chapter line, then its articles indented.
pub fn render_sources(citations: &[Citation]) -> String {
    let mut text = String::new();
    let mut current: Option<&str> = None;
    for c in citations {
        if current != Some(c.chapter_label.as_str()) {
            text.push_str(&c.chapter_label);
            text.push('\n');
            current = Some(c.chapter_label.as_str());
        }
        text.push_str("    ");
        text.push_str(&c.article_label);
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(chapter: &str, label: &str) -> ArticleMeta {
        ArticleMeta { chapter_label: chapter.into(), article_label: label.into(), ..ArticleMeta::default() }
    }

    #[test]
    fn groups_sorts_and_dedupes() {
        let metas = vec![
            meta("Chapter II", "Pasal 3 (Part 2)"),
            meta("Chapter II", "Pasal 3 (Part 1)"),
            meta("Chapter I", "Pasal 10"),
        ];
        let out = format_sources(&metas);
        assert_eq!(out, vec![Citation::new("Chapter I", "Pasal 10"), Citation::new("Chapter II", "Pasal 3")]);
    }

    #[test]
    fn numeric_order_and_unknowns_last() {
        let metas = vec![
            meta("BAB I", "Ketentuan Lain"),
            meta("BAB I", "Pasal 10"),
            meta("BAB I", "Pasal 2"),
            meta("", "Pasal 7"),
        ];
        let out = format_sources(&metas);
        let labels: Vec<_> = out.iter().map(|c| (c.chapter_label.as_str(), c.article_label.as_str())).collect();
        assert_eq!(
            labels,
            vec![("BAB I", "Pasal 2"), ("BAB I", "Pasal 10"), ("BAB I", "Ketentuan Lain"), (UNKNOWN_CHAPTER, "Pasal 7")]
        );
    }

    #[test]
    fn rendering_prints_each_chapter_once() {
        let text = render_sources(&[Citation::new("BAB I", "Pasal 1"), Citation::new("BAB I", "Pasal 2")]);
        assert_eq!(text, "BAB I\n    Pasal 1\n    Pasal 2\n");
    }
}
