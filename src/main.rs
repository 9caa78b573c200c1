//! Sumi-Search main entry point
//!
//! This is the command-line interface for the Sumi-Search crawler and index.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sumi_search::config::{load_config_with_hash, read_seeds_file, Config};
use sumi_search::crawler::{crawl, CrawlRequest};
use sumi_search::output::{print_crawl_report, print_index_stats, print_search_results};
use sumi_search::sink::{self, DocumentSink, SearchRequest, SqliteSink};
use sumi_search::{LinguisticResources, Normalizer};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sumi-Search: a breadth-first crawler feeding a weighted full-text index
///
/// Sumi-Search crawls outward from seed URLs, normalizes page text, and
/// stores documents in a SQLite index ranked with title weighted above body.
#[derive(Parser, Debug)]
#[command(name = "sumi-search")]
#[command(version)]
#[command(about = "A breadth-first crawler and full-text search index", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl from seed URLs and index the pages found
    Crawl(CrawlArgs),
    /// Run a ranked full-text query against the index
    Search(SearchArgs),
    /// Show statistics about the index
    Stats,
    /// Recompute normalized text for every stored document
    Reindex,
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Seed URL (repeatable); replaces the seeds from the config file
    #[arg(long = "seed", value_name = "URL")]
    seeds: Vec<String>,

    /// File with one seed URL per line
    #[arg(long, value_name = "PATH")]
    seeds_file: Option<PathBuf>,

    /// Maximum number of pages to fetch
    #[arg(long)]
    max_pages: Option<usize>,

    /// Only follow links to the seed hosts
    #[arg(long, conflicts_with = "any_domain")]
    same_domain_only: bool,

    /// Follow links to any host
    #[arg(long, conflicts_with = "same_domain_only")]
    any_domain: bool,

    /// Number of concurrent fetch workers
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=64))]
    workers: Option<u16>,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Search query text (FTS5 syntax: AND, OR, NOT, "phrases")
    #[arg(short = 'Q', long)]
    query: String,

    /// Number of results to return
    #[arg(long)]
    limit: Option<usize>,

    /// Number of results to skip
    #[arg(long, default_value_t = 0)]
    skip: usize,

    /// Output results as JSON {"urls": [...], "count": N}
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;

    match cli.command {
        Command::Crawl(args) => handle_crawl(config, args).await,
        Command::Search(args) => handle_search(&config, args),
        Command::Stats => handle_stats(&config),
        Command::Reindex => handle_reindex(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` takes precedence when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            // Only show errors
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("sumi_search=info,warn"),
                1 => EnvFilter::new("sumi_search=debug,info"),
                2 => EnvFilter::new("sumi_search=trace,debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

fn open_sink(config: &Config) -> anyhow::Result<SqliteSink> {
    let path = Path::new(&config.index.database_path);
    tracing::debug!("Opening index at {}", path.display());
    SqliteSink::new(path).with_context(|| format!("failed to open index at {}", path.display()))
}

/// Handles the crawl command
async fn handle_crawl(mut config: Config, args: CrawlArgs) -> anyhow::Result<()> {
    // Command-line flags override the file
    let mut seeds = args.seeds;
    if let Some(path) = &args.seeds_file {
        seeds.extend(read_seeds_file(path)?);
    }
    if !seeds.is_empty() {
        config.seeds = seeds;
    }
    if let Some(max_pages) = args.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if args.same_domain_only {
        config.crawler.same_domain_only = true;
    } else if args.any_domain {
        config.crawler.same_domain_only = false;
    }
    if let Some(workers) = args.workers {
        config.crawler.workers = usize::from(workers);
    }

    tracing::info!(
        "Seeds: {}, max pages: {}, same domain only: {}",
        config.seeds.len(),
        config.crawler.max_pages,
        config.crawler.same_domain_only
    );

    let mut index = open_sink(&config)?;

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight pages");
            ctrl_c_token.cancel();
        }
    });

    let report = crawl(CrawlRequest::from_config(&config), &config, &mut index, cancel).await?;
    print_crawl_report(&report);

    report.into_result()?;
    Ok(())
}

/// Handles the search command
fn handle_search(config: &Config, args: SearchArgs) -> anyhow::Result<()> {
    let index = open_sink(config)?;

    let request = SearchRequest {
        query: args.query,
        limit: args.limit,
        skip: args.skip,
    };
    tracing::info!(
        "Search: q='{}' limit={:?} skip={}",
        request.query,
        request.limit,
        request.skip
    );

    let hits = sink::search(&index, &request, &config.search)?;
    tracing::info!("Found {} results", hits.len());

    print_search_results(&hits, args.json)?;
    Ok(())
}

/// Handles the stats command
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let index = open_sink(config)?;

    println!("Database: {}\n", config.index.database_path);
    print_index_stats(&index.stats()?);
    Ok(())
}

/// Handles the reindex command
fn handle_reindex(config: &Config) -> anyhow::Result<()> {
    let mut index = open_sink(config)?;

    let resources = LinguisticResources::load(&config.normalizer)?;
    let normalizer = Normalizer::new(Arc::new(resources));

    let updated = sink::reindex(&mut index, &normalizer)?;
    println!("✓ Reindexed {} documents", updated);
    Ok(())
}
