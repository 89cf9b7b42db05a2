/// Size limits for article bodies.
#[derive(Debug, Clone, Copy)]
pub struct TextChunkParams {
    /// Bodies longer than this (in characters) are split into parts.
    pub max_chars: usize,
}

impl Default for TextChunkParams {
    fn default() -> Self {
        Self { max_chars: 1000 }
    }
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split on sentence ends: a period or semicolon followed by whitespace.
/// The terminator stays with its sentence; the whitespace is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut it = text.char_indices().peekable();
    while let Some((idx, ch)) = it.next() {
        if !matches!(ch, '.' | ';') { continue; }
        let end = idx + ch.len_utf8();
        match it.peek() {
            Some(&(_, next)) if next.is_whitespace() => {
                let seg = &text[start..end];
                if !seg.trim().is_empty() { out.push(seg.trim()); }
                // skip the whitespace run
                let mut resume = end;
                while let Some(&(j, c)) = it.peek() {
                    if !c.is_whitespace() { break; }
                    resume = j + c.len_utf8();
                    it.next();
                }
                start = resume;
            }
            _ => {}
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() { out.push(tail); }
    out
}

/// Greedily pack sentences into parts of at most `params.max_chars` characters.
///
/// Parts are joined by a single space when re-concatenated. A sentence that alone exceeds
/// the limit is cut on whitespace (or on character boundaries for an unbroken run).
pub fn split_long_text(text: &str, params: &TextChunkParams) -> Vec<String> {
    let max = params.max_chars.max(1);
    let mut parts: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for sentence in split_sentences(text) {
        let len = sentence.chars().count();
        if len > max {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            let mut pieces = hard_split(sentence, max);
            // the last piece stays open so following sentences can still pack onto it
            let last = pieces.pop().unwrap_or_default();
            parts.extend(pieces);
            current_len = last.chars().count();
            current = last;
            continue;
        }
        let sep = if current.is_empty() { 0 } else { 1 };
        if current_len + sep + len <= max {
            if sep == 1 { current.push(' '); }
            current.push_str(sentence);
            current_len += sep + len;
        } else {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            current.push_str(sentence);
            current_len = len;
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn hard_split(sentence: &str, max: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    for word in sentence.split_whitespace() {
        let len = word.chars().count();
        if len > max {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max) {
                out.push(piece.iter().collect());
            }
            continue;
        }
        let sep = if current.is_empty() { 0 } else { 1 };
        if current_len + sep + len <= max {
            if sep == 1 { current.push(' '); }
            current.push_str(word);
            current_len += sep + len;
        } else {
            out.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = len;
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  Setiap\tOrang \n berhak  "), "Setiap Orang berhak");
    }

    #[test]
    fn sentences_end_on_period_or_semicolon_before_space() {
        let s = split_sentences("a. huruf a; b. huruf b.  Ayat 2 v1.2 tetap");
        assert_eq!(s, vec!["a.", "huruf a;", "b.", "huruf b.", "Ayat 2 v1.2 tetap"]);
    }

    #[test]
    fn short_text_is_a_single_part() {
        let parts = split_long_text("Satu. Dua.", &TextChunkParams::default());
        assert_eq!(parts, vec!["Satu. Dua."]);
    }

    #[test]
    fn oversized_sentence_is_cut_to_limit() {
        let params = TextChunkParams { max_chars: 10 };
        let parts = split_long_text("aaaa bbbb cccc dddd. ee.", &params);
        assert!(parts.iter().all(|p| p.chars().count() <= 10), "{parts:?}");
        assert_eq!(parts.join(" "), "aaaa bbbb cccc dddd. ee.");
    }
}
