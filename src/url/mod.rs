//! URL handling module for Sumi-Search
//!
//! This module provides URL canonicalization, domain extraction, and the
//! domain scope used to keep a crawl on its seed hosts.

mod domain;
mod normalize;

pub use domain::{extract_domain, DomainScope};
pub use normalize::{canonicalize, normalize_url};
