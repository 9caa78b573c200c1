use crate::config::NormalizerConfig;
use crate::normalize::lemmatizer::{Lemma, Lemmatizer};
use crate::normalize::stopwords::Stopwords;
use crate::normalize::tokenizer::clean_token;
use crate::NormalizeError;
use once_cell::sync::OnceCell;
use rust_stemmers::{Algorithm, Stemmer};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

static SHARED: OnceCell<Arc<LinguisticResources>> = OnceCell::new();

/// Stopword list, lemma dictionary and stemmer used for normalization
///
/// Resources are immutable once built and are shared across workers behind
/// an `Arc`.
pub struct LinguisticResources {
    stopwords: Stopwords,
    lemmatizer: Lemmatizer,
    stemmer: Stemmer,
}

impl LinguisticResources {
    /// Builds resources from configuration
    ///
    /// A configured stopword file replaces the built-in English list.
    ///
    /// # Errors
    ///
    /// Returns a `NormalizeError` when the stopword file cannot be loaded.
    pub fn load(config: &NormalizerConfig) -> Result<Self, NormalizeError> {
        let stopwords = match &config.stopwords_path {
            Some(path) => Stopwords::from_file(Path::new(path))?,
            None => Stopwords::english(),
        };

        Self::with_stopwords(stopwords)
    }

    /// The process-wide default resources, built on first use
    pub fn shared() -> Result<Arc<Self>, NormalizeError> {
        SHARED
            .get_or_try_init(|| Self::with_stopwords(Stopwords::english()).map(Arc::new))
            .map(Arc::clone)
    }

    fn with_stopwords(stopwords: Stopwords) -> Result<Self, NormalizeError> {
        let lemmatizer = Lemmatizer::english()?;
        tracing::debug!(
            "Loaded {} stopwords and {} lemma entries",
            stopwords.len(),
            lemmatizer.len()
        );

        Ok(Self {
            stopwords,
            lemmatizer,
            stemmer: Stemmer::create(Algorithm::English),
        })
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Reduces a lowercased token to its index form
    ///
    /// Lemmatizing and stemming repeat until the form stops changing, so the
    /// result is its own index form. A form that cycles settles on the
    /// smallest member of the cycle.
    pub fn base_form(&self, token: &str) -> String {
        let mut seen: Vec<String> = Vec::new();
        let mut current = token.to_string();

        loop {
            let next = self.reduce_once(&current);
            if next == current {
                return current;
            }

            seen.push(current);
            if let Some(start) = seen.iter().position(|form| *form == next) {
                return seen.split_off(start).into_iter().min().unwrap_or(next);
            }
            current = next;
        }
    }

    fn reduce_once(&self, token: &str) -> String {
        let stemmed = match self.lemmatizer.lemmatize(token) {
            Lemma::Dictionary(base) => return base,
            // "city" stems to "citi", so "cities" has to get there too.
            Lemma::Derived(candidate) => self.stemmer.stem(&candidate).into_owned(),
            Lemma::Unknown => self.stemmer.stem(token).into_owned(),
        };

        clean_token(&stemmed).unwrap_or(stemmed)
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }
}

impl fmt::Debug for LinguisticResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinguisticResources")
            .field("stopwords", &self.stopwords.len())
            .field("lemmas", &self.lemmatizer.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_shared_is_built_once() {
        let a = LinguisticResources::shared().unwrap();
        let b = LinguisticResources::shared().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_base_form() {
        let resources = LinguisticResources::shared().unwrap();
        assert_eq!(resources.base_form("cats"), "cat");
        assert_eq!(resources.base_form("running"), "run");
        assert_eq!(resources.base_form("children"), "child");
        assert_eq!(resources.base_form("mice"), "mouse");
        assert_eq!(resources.base_form("bests"), "good");
    }

    #[test]
    fn test_base_form_is_a_fixed_point() {
        let resources = LinguisticResources::shared().unwrap();
        let words = [
            "arise", "arising", "anywhere", "reference", "references", "api-reference",
            "state-of-the-art", "cities", "city", "studies", "generously", "organization",
            "happiness", "relational", "hopefully", "dying", "skies", "news", "series",
            "analyses", "crises", "wolves", "better", "ran", "café", "naïve",
        ];

        for word in words {
            let once = resources.base_form(word);
            assert_eq!(resources.base_form(&once), once, "{}", word);
        }
    }

    #[test]
    fn test_plural_and_singular_share_a_form() {
        let resources = LinguisticResources::shared().unwrap();
        assert_eq!(resources.base_form("cities"), resources.base_form("city"));
        assert_eq!(resources.base_form("studies"), resources.base_form("study"));
        assert_eq!(resources.base_form("boxes"), resources.base_form("box"));
        assert_eq!(resources.base_form("analyses"), "analysis");
    }

    #[test]
    fn test_load_with_custom_stopwords() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "crawler").unwrap();

        let config = NormalizerConfig {
            stopwords_path: Some(file.path().display().to_string()),
        };
        let resources = LinguisticResources::load(&config).unwrap();

        assert_eq!(resources.stopword_count(), 1);
        assert!(resources.is_stopword("crawler"));
        assert!(!resources.is_stopword("the"));
    }

    #[test]
    fn test_load_missing_stopwords_is_fatal() {
        let config = NormalizerConfig {
            stopwords_path: Some("/nonexistent/stopwords.txt".to_string()),
        };
        assert!(LinguisticResources::load(&config).is_err());
    }
}
