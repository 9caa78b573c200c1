use once_cell::sync::Lazy;
use regex::Regex;

// A word starts with a letter and may contain inner apostrophes or hyphens.
static WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\p{Alphabetic}[\p{Alphabetic}'\u{2019}\-]*").expect("word pattern is valid")
});

/// Splits lowercased text into word tokens
///
/// Digits and punctuation separate tokens and never appear in them. Curly
/// apostrophes are folded to `'`, a trailing possessive `'s` is dropped, and
/// stray trailing apostrophes or hyphens are trimmed.
///
/// # Example
///
/// ```
/// use sumi_search::normalize::tokenize;
///
/// assert_eq!(tokenize("rust's state-of-the-art x2 crawler"), vec![
///     "rust", "state-of-the-art", "x", "crawler",
/// ]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .filter_map(|m| clean_token(m.as_str()))
        .collect()
}

/// Folds apostrophes and strips trailing possessives and marks until stable
///
/// Applying it to its own output returns that output unchanged.
pub(crate) fn clean_token(raw: &str) -> Option<String> {
    let mut token = raw.replace('\u{2019}', "'");
    loop {
        let trimmed = token.trim_end_matches(['\'', '-']);
        let trimmed = trimmed.strip_suffix("'s").unwrap_or(trimmed);
        if trimmed.len() == token.len() {
            break;
        }
        token = trimmed.to_string();
    }

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
