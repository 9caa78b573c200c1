//! Integration tests for Sumi-Search
//!
//! These tests run full crawls against wiremock servers and query the
//! resulting index.

mod common;
mod crawl_tests;
mod search_tests;
