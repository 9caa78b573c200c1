use crate::UrlError;
use url::Url;

/// Query parameters that never change page content and are dropped
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid"];

/// Normalizes a URL into the canonical form used as the crawl dedup key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an `http` or `https` scheme (the scheme itself is kept)
/// 3. Require a host; the host is lowercased and default ports are dropped
/// 4. Normalize path:
///    - Remove dot segments (. and ..) and empty segments
///    - Remove trailing slash (except for root /)
///    - Path case is preserved
/// 5. Remove fragment (everything after #)
/// 6. Remove tracking query parameters (`utm_*`, `fbclid`, `gclid`)
/// 7. Sort remaining query parameters by key; each parameter keeps its
///    original spelling, so `?flag` stays valueless and `%20` is not
///    rewritten as `+`
/// 8. Remove empty query string (trailing ?)
///
/// # Examples
///
/// ```
/// use sumi_search::url::normalize_url;
///
/// let url = normalize_url("HTTPS://Example.COM:443/docs/#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    canonicalize(url)
}

/// Canonicalizes an already parsed URL (see [`normalize_url`])
pub fn canonicalize(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingDomain),
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);

    if let Some(query) = url.query() {
        let query = filter_and_sort_query(query);
        url.set_query((!query.is_empty()).then_some(query.as_str()));
    }

    Ok(url)
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Filters out tracking parameters and sorts the remainder by key
///
/// Parameters are compared and kept in their raw, still-encoded form. The
/// sort is stable, so repeated keys keep their relative order.
fn filter_and_sort_query(query: &str) -> String {
    let mut params: Vec<(&str, &str)> = query
        .split('&')
        .filter(|param| !param.is_empty())
        .map(|param| (param.split('=').next().unwrap_or(param), param))
        .filter(|(key, _)| !is_tracking_param(key))
        .collect();

    params.sort_by(|a, b| a.0.cmp(b.0));
    params
        .into_iter()
        .map(|(_, param)| param)
        .collect::<Vec<_>>()
        .join("&")
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}
