//! Web Scraper main entry point
//!
//! This is the command-line interface for the crawl engine.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use web_scraper::auth::CookieStore;
use web_scraper::config::{load_config_with_hash, resolve_media_types, CrawlConfig};
use web_scraper::crawler::run_crawl;
use web_scraper::output::print_summary;

/// Web Scraper: a bounded crawl engine
///
/// Crawls from a set of seed URLs, follows links within page depth and
/// cross-host dispersal limits, and saves accepted files or logs their
/// URLs for downstream ingestion.
#[derive(Parser, Debug)]
#[command(name = "web-scraper")]
#[command(version = "1.0.0")]
#[command(about = "A bounded crawl engine", long_about = None)]
struct Cli {
    /// Path to TOML or JSON configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Delete persisted session cookies before crawling
    #[arg(long)]
    clear_cookies: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    if cli.clear_cookies {
        let store = CookieStore::new(&config.cookie_folder);
        let removed = store
            .clear()
            .await
            .with_context(|| format!("Failed to clear {}", store.folder().display()))?;
        tracing::info!("Removed {} cookie files", removed);
    }

    let summary = run_crawl(config).await.context("Crawl failed")?;
    if !cli.quiet {
        print_summary(&summary);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("web_scraper=info,warn"),
            1 => EnvFilter::new("web_scraper=debug,info"),
            2 => EnvFilter::new("web_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &CrawlConfig) {
    println!("=== Web Scraper Dry Run ===\n");

    println!("Crawl Limits:");
    match config.max_page_depth {
        Some(depth) => println!("  Max page depth: {}", depth),
        None => println!("  Max page depth: unlimited"),
    }
    println!("  Max host depth: {}", config.max_host_depth.unwrap_or(0));
    println!("  Concurrency: {}", config.concurrency);
    println!("  Batch size: {}", config.batch_size());
    if let Some(deadline) = config.crawl_deadline_secs {
        println!("  Deadline: {}s", deadline);
    }

    println!("\nAccepted Media Types:");
    for media_type in resolve_media_types(&config.file_types) {
        println!("  - {}", media_type);
    }

    println!("\nOutput:");
    if config.download_files {
        if let Some(folder) = &config.output_folder {
            println!("  Save files to: {}", folder.display());
        }
    } else if let Some(log) = &config.url_log_file_path {
        println!("  Log URLs to: {}", log.display());
    }

    if !config.allowed_domains.is_empty() {
        println!("\nAllowed Domains ({}):", config.allowed_domains.len());
        for domain in &config.allowed_domains {
            println!("  - {}", domain);
        }
    }

    if config.protected {
        println!("\nAuthentication:");
        println!("  Cookie folder: {}", config.cookie_folder.display());
        if let Some(login_url) = config.login_config.as_ref().and_then(|l| l.login_url.as_ref()) {
            println!("  Login URL: {}", login_url);
        }
    }

    println!("\nSeed URLs ({}):", config.start_urls.len());
    for url in &config.start_urls {
        println!("  * {}", url);
    }

    println!("\n✓ Configuration is valid");
}
