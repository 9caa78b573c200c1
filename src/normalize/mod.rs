//! Text normalization for indexing and querying
//!
//! Documents and queries go through the same pipeline, so a query term
//! matches every inflection that reduces to the same index form:
//!
//! 1. lowercase and split into word tokens
//! 2. drop stopwords
//! 3. reduce each token to its dictionary lemma, falling back to the
//!    Snowball English stemmer for tokens the dictionary does not confirm
//! 4. drop stopwords and single-character tokens produced by step 3
//!
//! Normalizing an already normalized token sequence returns it unchanged.

mod lemmatizer;
mod resources;
mod stopwords;
mod tokenizer;

pub use lemmatizer::{Lemma, Lemmatizer};
pub use resources::LinguisticResources;
pub use stopwords::Stopwords;
pub use tokenizer::tokenize;

use crate::NormalizeError;
use std::sync::Arc;

/// Normalized form of a text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedText {
    /// Index tokens in document order
    pub tokens: Vec<String>,

    /// Tokens joined by single spaces, as stored in the index
    pub joined: String,
}

/// Deterministic text normalizer
///
/// Cloning is cheap; clones share the same resources.
#[derive(Debug, Clone)]
pub struct Normalizer {
    resources: Arc<LinguisticResources>,
}

impl Normalizer {
    pub fn new(resources: Arc<LinguisticResources>) -> Self {
        Self { resources }
    }

    /// Normalizer over the process-wide default resources
    pub fn shared() -> Result<Self, NormalizeError> {
        Ok(Self::new(LinguisticResources::shared()?))
    }

    /// Reduces text to its ordered index tokens
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_search::Normalizer;
    ///
    /// let normalizer = Normalizer::shared().unwrap();
    /// assert_eq!(normalizer.normalize("The Cats are RUNNING"), vec!["cat", "run"]);
    /// ```
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();

        tokenize(&lowered)
            .into_iter()
            .filter(|token| !self.resources.is_stopword(token))
            .map(|token| self.resources.base_form(&token))
            .filter(|token| token.chars().count() > 1 && !self.resources.is_stopword(token))
            .collect()
    }

    /// Normalizes text and joins the tokens for storage
    pub fn normalize_document(&self, text: &str) -> NormalizedText {
        let tokens = self.normalize(text);
        let joined = tokens.join(" ");
        tracing::trace!("Normalized {} chars into {} tokens", text.len(), tokens.len());
        NormalizedText { tokens, joined }
    }

    pub fn resources(&self) -> &LinguisticResources {
        &self.resources
    }
}

/// Collapses whitespace and truncates to at most `max_chars` characters
///
/// Truncated text ends with a single `…`, which counts toward the limit.
///
/// # Example
///
/// ```
/// use sumi_search::normalize::summarize_text;
///
/// assert_eq!(summarize_text("  a\n\n b  ", 10), "a b");
/// assert_eq!(summarize_text("abcdef", 4), "abc…");
/// ```
pub fn summarize_text(text: &str, max_chars: usize) -> String {
    let clean = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if clean.chars().count() <= max_chars {
        return clean;
    }
    if max_chars == 0 {
        return String::new();
    }

    let mut summary: String = clean.chars().take(max_chars - 1).collect();
    summary.push('…');
    summary
}
