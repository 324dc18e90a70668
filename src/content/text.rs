//! Text primitives: word-boundary containment and word counting

/// Characters that delimit a token in titles and names
const SEPARATORS: &[char] = &[
    '-', '|', ':', '·', '•', '—', '–', '/', ',', '.', '(', ')', '[', ']', '!', '?', '\'', '"',
    '&', '+', '_', ';',
];

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || SEPARATORS.contains(&c)
}

/// Whether `needle` occurs in `haystack` as a delimited token.
///
/// Case-insensitive. A match must be bounded on both sides by the start/end
/// of the string, whitespace, or a common separator, so `acme` does not match
/// inside `acmeville`.
pub fn contains_at_word_boundary(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    let haystack = haystack.to_lowercase();

    let mut from = 0;
    while let Some(pos) = haystack[from..].find(&needle) {
        let start = from + pos;
        let end = start + needle.len();
        let before_ok = haystack[..start].chars().next_back().is_none_or(is_delimiter);
        let after_ok = haystack[end..].chars().next().is_none_or(is_delimiter);
        if before_ok && after_ok {
            return true;
        }
        // Advance by one char to find overlapping candidates
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// Collapse runs of whitespace and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Count words (alphanumeric runs)
pub fn word_count(text: &str) -> usize {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .count()
}
