//! Article label helpers shared by ingestion, retrieval and citation formatting.

use std::sync::LazyLock;

use regex::Regex;

/// The statute's word for "article".
pub const ARTICLE_WORD: &str = "Pasal";

static ARTICLE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Pasal\s*(\d+)").expect("article number regex is valid")
});

static PART_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\(Part\s*\d+\)").expect("part suffix regex is valid")
});

/// Canonical identifier for an article number, e.g. `Pasal 12`.
pub fn article_key(number: u32) -> String {
    format!("{ARTICLE_WORD} {number}")
}

/// First article number mentioned in `label`, if any.
pub fn article_number(label: &str) -> Option<u32> {
    ARTICLE_NUMBER_RE
        .captures(label)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Article root of a (possibly part-suffixed) label. Labels without a number are kept verbatim.
pub fn article_root(label: &str) -> String {
    match article_number(label) {
        Some(n) => article_key(n),
        None => label.to_string(),
    }
}

/// Label for the `part`-th (1-indexed) piece of a split article.
pub fn part_label(label: &str, part: usize) -> String {
    format!("{label} (Part {part})")
}

pub fn strip_part_suffix(label: &str) -> String {
    PART_SUFFIX_RE.replace_all(label, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_strips_part_suffix_and_normalizes_spacing() {
        assert_eq!(article_root("Pasal 3 (Part 2)"), "Pasal 3");
        assert_eq!(article_root("Pasal   07"), "Pasal 7");
        assert_eq!(article_root("Ketentuan Peralihan"), "Ketentuan Peralihan");
    }

    #[test]
    fn part_labels_round_trip_through_strip() {
        let label = part_label("Pasal 15", 3);
        assert_eq!(label, "Pasal 15 (Part 3)");
        assert_eq!(strip_part_suffix(&label), "Pasal 15");
        assert_eq!(strip_part_suffix("Pasal 15"), "Pasal 15");
    }

    #[test]
    fn number_is_none_without_article_word() {
        assert_eq!(article_number("BAB IV"), None);
        assert_eq!(article_number("lihat Pasal 20 ayat (1)"), Some(20));
    }
}
