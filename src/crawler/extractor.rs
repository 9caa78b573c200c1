//! HTML content and link extraction
//!
//! This module turns a fetched HTML body into:
//! - The page title (from the `<title>` tag)
//! - Visible body text for the index
//! - Outbound links to offer to the frontier

use crate::url::canonicalize;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements whose text is never visible
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Content extracted from one HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    /// Whitespace-collapsed `<title>` text, empty if absent
    pub title: String,

    /// Whitespace-collapsed visible text
    pub body_text: String,

    /// Canonical outbound links, deduplicated, in document order
    pub outbound_links: Vec<Url>,
}

/// Result of running the extractor on a body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Parsed(ExtractedContent),
    /// The body could not be treated as an HTML document
    Failed(String),
}

impl Extraction {
    /// The extracted content, or empty content on failure
    pub fn into_content(self) -> ExtractedContent {
        match self {
            Self::Parsed(content) => content,
            Self::Failed(_) => ExtractedContent::default(),
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }
}

/// Extracts title, visible text and links from an HTML body
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` and `<area href="...">`, resolved against `<base href>`
///   when present, otherwise against `page_url`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - Fragment-only links (same page anchors)
/// - Anything that does not resolve to an http(s) URL (`javascript:`,
///   `mailto:`, `tel:`, data URIs)
///
/// Extraction never panics and never returns an error; a body that is empty
/// or binary yields [`Extraction::Failed`].
///
/// # Example
///
/// ```
/// use sumi_search::crawler::extract;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let page_url = Url::parse("https://example.com/").unwrap();
/// let content = extract(html, &page_url).into_content();
/// assert_eq!(content.title, "Test");
/// assert_eq!(content.outbound_links[0].as_str(), "https://example.com/page");
/// ```
pub fn extract(raw_body: &str, page_url: &Url) -> Extraction {
    if raw_body.trim().is_empty() {
        return Extraction::Failed("empty document".to_string());
    }
    if raw_body.contains('\0') {
        return Extraction::Failed("binary content".to_string());
    }

    let document = Html::parse_document(raw_body);
    let base_url = document_base(&document, page_url);

    Extraction::Parsed(ExtractedContent {
        title: extract_title(&document),
        body_text: extract_visible_text(&document),
        outbound_links: extract_links(&document, &base_url),
    })
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Resolves the effective base URL from `<base href>`
fn document_base(document: &Html, page_url: &Url) -> Url {
    selector("base[href]")
        .and_then(|base| {
            document
                .select(&base)
                .next()
                .and_then(|element| element.value().attr("href"))
                .and_then(|href| page_url.join(href.trim()).ok())
        })
        .unwrap_or_else(|| page_url.clone())
}

fn extract_title(document: &Html) -> String {
    selector("title")
        .and_then(|title| {
            document
                .select(&title)
                .next()
                .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        })
        .unwrap_or_default()
}

fn extract_visible_text(document: &Html) -> String {
    let fragments = collect_visible_text(document.root_element());
    collapse_whitespace(&fragments.join(" "))
}

/// Walks the tree in document order with an explicit stack, so nesting depth
/// is bounded by heap rather than call stack
fn collect_visible_text(root: ElementRef<'_>) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut pending: Vec<_> = root.children().rev().collect();

    while let Some(node) = pending.pop() {
        match node.value() {
            Node::Text(text) => fragments.push(&**text),
            Node::Element(el) if HIDDEN_ELEMENTS.contains(&el.name()) => {}
            Node::Element(_) => pending.extend(node.children().rev()),
            _ => {}
        }
    }

    fragments
}

fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let Some(anchors) = selector("a[href], area[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&anchors) {
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(link) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, base_url))
        else {
            continue;
        };

        if seen.insert(link.as_str().to_string()) {
            links.push(link);
        }
    }

    links
}

/// Resolves a link href to a canonical absolute URL
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    canonicalize(absolute).ok()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
