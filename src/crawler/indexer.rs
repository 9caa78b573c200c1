//! Builds index documents from fetched pages

use crate::crawler::extractor::ExtractedContent;
use crate::crawler::fetcher::FetchedPage;
use crate::normalize::{summarize_text, Normalizer};
use crate::sink::IndexedDocument;

/// Assembles the document stored for a fetched page
///
/// The title is indexed as extracted; the body text is stored raw for
/// re-indexing and normalized for search.
pub fn build_document(
    page: &FetchedPage,
    content: &ExtractedContent,
    normalizer: &Normalizer,
    excerpt_max_chars: usize,
) -> IndexedDocument {
    let normalized = normalizer.normalize_document(&content.body_text);

    IndexedDocument {
        url: page.url.to_string(),
        final_url: page.final_url.to_string(),
        title: content.title.clone(),
        index_text: normalized.joined,
        raw_text: content.body_text.clone(),
        excerpt: summarize_text(&content.body_text, excerpt_max_chars),
        content_length: page.content_length,
        crawled_at: page.fetched_at,
    }
}
