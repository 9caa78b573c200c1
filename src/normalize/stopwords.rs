use crate::NormalizeError;
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_ENGLISH: &str = include_str!("data/stopwords_en.txt");

/// Set of tokens removed before lemmatization
///
/// Entries are stored lowercased. Lookups expect an already lowercased token.
#[derive(Debug, Clone)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// The standard English list (179 entries, contractions included)
    pub fn english() -> Self {
        Self::from_lines(BUILTIN_ENGLISH)
    }

    /// Loads a replacement list, one word per line
    ///
    /// Blank lines and lines starting with `#` are ignored.
    ///
    /// # Errors
    ///
    /// Returns `NormalizeError::StopwordsIo` if the file cannot be read and
    /// `NormalizeError::EmptyStopwords` if it contains no words.
    pub fn from_file(path: &Path) -> Result<Self, NormalizeError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| NormalizeError::StopwordsIo {
                path: path.display().to_string(),
                source,
            })?;

        let stopwords = Self::from_lines(&content);
        if stopwords.is_empty() {
            return Err(NormalizeError::EmptyStopwords(path.display().to_string()));
        }
        Ok(stopwords)
    }

    fn from_lines(content: &str) -> Self {
        let words = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Self { words }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
