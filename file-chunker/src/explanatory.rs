use std::collections::HashMap;

use crate::classifier::{ParagraphClass, ParagraphClassifier};

/// Build the article → explanatory note map from the paragraphs of the explanatory section.
///
/// Accumulation restarts at every article heading; paragraphs before the first heading
/// (the general explanation) belong to no article and are dropped.
pub fn parse_explanatory_notes<C: ParagraphClassifier + ?Sized>(
    paragraphs: &[String],
    classifier: &C,
) -> HashMap<String, String> {
    let mut pieces: HashMap<String, Vec<String>> = HashMap::new();
    let mut current: Option<String> = None;

    for para in paragraphs {
        match classifier.classify(para) {
            ParagraphClass::ExplanatorySection => {}
            ParagraphClass::ArticleHeading { key } => {
                pieces.insert(key.clone(), Vec::new());
                current = Some(key);
            }
            ParagraphClass::SufficientlyClear => {
                if let Some(list) = current.as_ref().and_then(|k| pieces.get_mut(k)) {
                    list.push(classifier.sufficiently_clear_note().to_string());
                }
            }
            ParagraphClass::ChapterHeading | ParagraphClass::Text => {
                if let Some(list) = current.as_ref().and_then(|k| pieces.get_mut(k)) {
                    list.push(para.trim().to_string());
                }
            }
        }
    }

    pieces
        .into_iter()
        .map(|(key, parts)| (key, parts.join(" ").trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::StatuteRules;

    fn paras(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn notes_are_keyed_by_canonical_article() {
        let input = paras(&[
            "PENJELASAN ATAS UNDANG-UNDANG REPUBLIK INDONESIA",
            "I. UMUM",
            "Pelindungan data pribadi merupakan hak asasi.",
            "II. PASAL DEMI PASAL",
            "Pasal 1",
            "Cukup jelas.",
            "Pasal 2",
            "Huruf a",
            "Yang dimaksud dengan data adalah ...",
        ]);
        let notes = parse_explanatory_notes(&input, &StatuteRules::default());
        assert_eq!(notes.len(), 2);
        assert_eq!(notes["Pasal 1"], "Cukup jelas.");
        assert_eq!(notes["Pasal 2"], "Huruf a Yang dimaksud dengan data adalah ...");
    }

    #[test]
    fn repeated_heading_restarts_the_note() {
        let input = paras(&["Pasal 3", "lama", "Pasal 3", "baru"]);
        let notes = parse_explanatory_notes(&input, &StatuteRules::default());
        assert_eq!(notes["Pasal 3"], "baru");
    }
}
