use std::collections::BTreeSet;
use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// Ports are not part of the domain.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_search::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://sub.example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("sub.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Set of hosts a crawl is allowed to visit
///
/// `Unrestricted` accepts every host. `Hosts` accepts a URL only when its host
/// equals one of the listed hosts exactly: `blog.example.com` does not match
/// `example.com`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainScope {
    Unrestricted,
    Hosts(BTreeSet<String>),
}

impl DomainScope {
    /// Builds the scope for a crawl from its seed URLs
    pub fn from_seeds<'a, I>(seeds: I, same_domain_only: bool) -> Self
    where
        I: IntoIterator<Item = &'a Url>,
    {
        if !same_domain_only {
            return Self::Unrestricted;
        }
        Self::Hosts(seeds.into_iter().filter_map(extract_domain).collect())
    }

    /// Returns true if the URL's host is inside the scope
    pub fn allows(&self, url: &Url) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Hosts(hosts) => extract_domain(url)
                .map(|domain| hosts.contains(&domain))
                .unwrap_or(false),
        }
    }

    /// The allowed hosts, empty when unrestricted
    pub fn hosts(&self) -> Vec<&str> {
        match self {
            Self::Unrestricted => Vec::new(),
            Self::Hosts(hosts) => hosts.iter().map(String::as_str).collect(),
        }
    }
}
