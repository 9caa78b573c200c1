//! Dictionary-backed lemmatizer with noun suffix detachment
//!
//! The lemmatizer recognizes a token in one of three ways:
//!
//! - the token is an irregular form or a base form listed in the dictionary,
//!   giving a [`Lemma::Dictionary`] result that is final
//! - a plural suffix rule applies, giving a [`Lemma::Derived`] candidate
//! - nothing applies, giving [`Lemma::Unknown`]
//!
//! Derived candidates and unknown tokens are left for the stemmer.

use crate::NormalizeError;
use std::collections::{HashMap, HashSet};

const BUILTIN_DICTIONARY: &str = include_str!("data/lemmas.tsv");

/// Shortest stem a suffix rule may leave behind, before any replacement
const MIN_RULE_STEM: usize = 2;

/// Noun suffix detachment rules, most specific first
const NOUN_RULES: &[(&str, &str)] = &[
    ("sses", "ss"),
    ("shes", "sh"),
    ("ches", "ch"),
    ("xes", "x"),
    ("ies", "y"),
    ("s", ""),
];

/// Endings that look plural but are not
const PROTECTED_ENDINGS: &[&str] = &["ss", "us", "is"];

/// Outcome of lemmatizing one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lemma {
    /// Confirmed by the dictionary
    Dictionary(String),
    /// Produced by a suffix rule
    Derived(String),
    /// Not recognized
    Unknown,
}

#[derive(Debug, Clone)]
pub struct Lemmatizer {
    irregular: HashMap<String, String>,
    bases: HashSet<String>,
}

impl Lemmatizer {
    /// Builds the lemmatizer from the embedded English dictionary
    pub fn english() -> Result<Self, NormalizeError> {
        Self::from_dictionary(BUILTIN_DICTIONARY)
    }

    /// Parses a tab-separated `inflected<TAB>base` dictionary
    ///
    /// Blank lines and `#` comments are skipped.
    ///
    /// # Errors
    ///
    /// Returns `NormalizeError::LemmaDictionary` for a line without exactly
    /// two non-empty fields.
    pub fn from_dictionary(content: &str) -> Result<Self, NormalizeError> {
        let mut irregular = HashMap::new();
        let mut bases = HashSet::new();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            match fields.as_slice() {
                [inflected, base] if !inflected.is_empty() && !base.is_empty() => {
                    irregular.insert(inflected.to_lowercase(), base.to_lowercase());
                    bases.insert(base.to_lowercase());
                }
                _ => {
                    return Err(NormalizeError::LemmaDictionary {
                        line: index + 1,
                        entry: line.to_string(),
                    })
                }
            }
        }

        Ok(Self { irregular, bases })
    }

    /// Looks up a lowercased token
    pub fn lemmatize(&self, token: &str) -> Lemma {
        if let Some(base) = self.irregular.get(token) {
            return Lemma::Dictionary(base.clone());
        }
        if self.bases.contains(token) {
            return Lemma::Dictionary(token.to_string());
        }

        match detach_noun_suffix(token) {
            Some(candidate) => Lemma::Derived(candidate),
            None => Lemma::Unknown,
        }
    }

    pub fn len(&self) -> usize {
        self.irregular.len()
    }

    pub fn is_empty(&self) -> bool {
        self.irregular.is_empty()
    }
}

fn detach_noun_suffix(token: &str) -> Option<String> {
    if PROTECTED_ENDINGS.iter().any(|ending| token.ends_with(ending)) {
        return None;
    }

    for (suffix, replacement) in NOUN_RULES {
        if let Some(stem) = token.strip_suffix(suffix) {
            if stem.chars().count() < MIN_RULE_STEM + usize::from(replacement.is_empty()) {
                continue;
            }
            return Some(format!("{}{}", stem, replacement));
        }
    }
    None
}
