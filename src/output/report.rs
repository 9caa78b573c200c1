//! Crawl report and index statistics display

use crate::crawler::CrawlReport;
use crate::sink::IndexStats;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Failures listed individually before the rest are summarized
const MAX_LISTED_FAILURES: usize = 20;

/// Renders a crawl report for the terminal
pub fn render_crawl_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Crawl Report ===\n");
    let _ = writeln!(out, "Status: {}", report.state);
    if let Some(reason) = &report.abort_reason {
        let _ = writeln!(out, "Abort reason: {}", reason);
    }
    let _ = writeln!(out, "Pages indexed: {}", report.pages_indexed);
    let _ = writeln!(out, "Pages fetched: {}", report.pages_fetched);
    let _ = writeln!(out, "URLs discovered: {}", report.urls_discovered);
    let _ = writeln!(out, "Errors: {}", report.errors.len());
    let _ = writeln!(out, "Elapsed: {:.1}s", report.elapsed.as_secs_f64());

    if !report.errors.is_empty() {
        // Count failures by kind
        let mut by_kind: BTreeMap<&str, usize> = BTreeMap::new();
        for failure in &report.errors {
            let kind = failure.kind.map(|k| k.as_str()).unwrap_or("other");
            *by_kind.entry(kind).or_insert(0) += 1;
        }

        let _ = writeln!(out, "\nErrors by Kind:");
        for (kind, count) in &by_kind {
            let _ = writeln!(out, "  {}: {}", kind, count);
        }

        let _ = writeln!(out, "\nFailed URLs:");
        for failure in report.errors.iter().take(MAX_LISTED_FAILURES) {
            let _ = writeln!(out, "  - {} ({})", failure.url, failure.reason);
        }
        if report.errors.len() > MAX_LISTED_FAILURES {
            let _ = writeln!(
                out,
                "  ... and {} more",
                report.errors.len() - MAX_LISTED_FAILURES
            );
        }
    }

    out
}

pub fn print_crawl_report(report: &CrawlReport) {
    print!("{}", render_crawl_report(report));
}

/// Renders index statistics for the terminal
pub fn render_index_stats(stats: &IndexStats) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Index Statistics ===\n");
    let _ = writeln!(out, "Documents: {}", stats.documents);
    let _ = writeln!(out, "Total content: {} bytes", stats.total_content_length);

    let average = if stats.documents > 0 {
        stats.total_content_length / stats.documents as u64
    } else {
        0
    };
    let _ = writeln!(out, "Average document: {} bytes", average);

    if let (Some(first), Some(last)) = (&stats.first_crawled_at, &stats.last_crawled_at) {
        let _ = writeln!(out, "First crawled: {}", first);
        let _ = writeln!(out, "Last crawled: {}", last);
    }

    out
}

/// Prints index statistics to stdout
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_index_stats(stats: &IndexStats) {
    print!("{}", render_index_stats(stats));
}
