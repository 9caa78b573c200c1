//! Rendering of search results

use crate::sink::SearchHit;
use serde::Serialize;
use std::fmt::Write;

/// Characters of excerpt shown per hit in text output
const EXCERPT_PREVIEW_CHARS: usize = 300;

/// Machine-readable search output
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SearchResultsJson {
    pub urls: Vec<String>,
    pub count: usize,
}

impl SearchResultsJson {
    pub fn from_hits(hits: &[SearchHit]) -> Self {
        let urls: Vec<String> = hits.iter().map(|hit| display_url(hit).to_string()).collect();
        Self {
            count: urls.len(),
            urls,
        }
    }
}

/// The URL a reader should follow: the post-redirect URL when known
fn display_url(hit: &SearchHit) -> &str {
    if hit.final_url.is_empty() {
        &hit.url
    } else {
        &hit.final_url
    }
}

/// Renders hits as numbered text blocks
///
/// Each hit is shown as:
///
/// ```text
/// [1] Title
///     URL: https://example.com/ | score=3.142
///     First 300 characters of the excerpt
/// ```
pub fn render_search_results(hits: &[SearchHit]) -> String {
    let mut out = String::new();

    for (i, hit) in hits.iter().enumerate() {
        let title = if hit.title.is_empty() {
            "(no title)"
        } else {
            &hit.title
        };
        let _ = writeln!(out, "[{}] {}", i + 1, title);
        let _ = writeln!(out, "    URL: {} | score={:.3}", display_url(hit), hit.score);

        if !hit.excerpt.is_empty() {
            let preview: String = hit.excerpt.chars().take(EXCERPT_PREVIEW_CHARS).collect();
            let _ = writeln!(out, "    {}", preview);
        }
        out.push('\n');
    }

    out
}

/// Renders hits as `{"urls": [...], "count": N}`
pub fn render_search_json(hits: &[SearchHit]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&SearchResultsJson::from_hits(hits))
}

/// Prints search results to stdout
///
/// # Arguments
///
/// * `hits` - Ranked hits, best first
/// * `json` - Print the JSON payload instead of text blocks
pub fn print_search_results(hits: &[SearchHit], json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", render_search_json(hits)?);
    } else if hits.is_empty() {
        println!("No results.");
    } else {
        print!("{}", render_search_results(hits));
    }
    Ok(())
}
