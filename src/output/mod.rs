//! Output module for terminal display
//!
//! This module handles:
//! - Printing crawl reports
//! - Printing search results as text or JSON
//! - Printing index statistics

mod report;
mod search;

pub use report::{print_crawl_report, print_index_stats, render_crawl_report, render_index_stats};
pub use search::{print_search_results, render_search_json, render_search_results, SearchResultsJson};
