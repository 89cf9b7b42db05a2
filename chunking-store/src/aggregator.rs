use std::collections::HashMap;

use chunk_model::{ArticleDocument, Chunk};
use tracing::info;

/// Regroup chunks into one document per article root.
///
/// Groups appear in first-seen order and chunk texts are joined in input order. The first
/// chunk of a group supplies the chapter and article labels; the note is the first non-empty one.
pub fn aggregate_chunks(chunks: &[Chunk]) -> Vec<ArticleDocument> {
    let mut docs: Vec<ArticleDocument> = Vec::new();
    let mut by_root: HashMap<String, usize> = HashMap::new();

    for chunk in chunks {
        let root = chunk.article_root();
        match by_root.get(&root) {
            Some(&idx) => {
                let doc = &mut docs[idx];
                if !doc.combined_text.is_empty() {
                    doc.combined_text.push(' ');
                }
                doc.combined_text.push_str(&chunk.text);
                if doc.explanatory_note.is_empty() && !chunk.explanatory_note.is_empty() {
                    doc.explanatory_note = chunk.explanatory_note.clone();
                }
            }
            None => {
                by_root.insert(root.clone(), docs.len());
                docs.push(ArticleDocument {
                    article_root: root,
                    combined_text: chunk.text.clone(),
                    chapter_label: chunk.chapter_label.clone(),
                    article_label: chunk.article_label.clone(),
                    explanatory_note: chunk.explanatory_note.clone(),
                });
            }
        }
    }
    info!(chunks = chunks.len(), documents = docs.len(), "aggregated chunks into articles");
    docs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_are_merged_in_order_with_first_labels() {
        let chunks = vec![
            Chunk::new("BAB I", "Pasal 1", "definisi", ""),
            Chunk::new("BAB II", "Pasal 3 (Part 1)", "awal", ""),
            Chunk::new("BAB II", "Pasal 3 (Part 2)", "akhir", "Cukup jelas."),
            Chunk::new("BAB II", "Pasal 4", "lain", ""),
        ];
        let docs = aggregate_chunks(&chunks);
        let roots: Vec<_> = docs.iter().map(|d| d.article_root.as_str()).collect();
        assert_eq!(roots, vec!["Pasal 1", "Pasal 3", "Pasal 4"]);
        assert_eq!(docs[1].combined_text, "awal akhir");
        assert_eq!(docs[1].article_label, "Pasal 3 (Part 1)");
        assert_eq!(docs[1].explanatory_note, "Cukup jelas.");
    }
}
