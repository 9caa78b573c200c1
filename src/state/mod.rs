//! Crawl lifecycle state
//!
//! A crawl run moves `Idle → Running` when its seeds are accepted and then
//! ends in exactly one terminal state: `Completed` or `Aborted`.

mod crawl_state;

pub use crawl_state::CrawlState;
