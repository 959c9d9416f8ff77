//! Sumi-Catalog main entry point
//!
//! This is the command-line interface for driving catalog crawls and
//! validating drivers against live sites.

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use sumi_catalog::config::{lint_driver, load_config_with_hash, Config};
use sumi_catalog::crawler::carry_over_sub_entries;
use sumi_catalog::output::{
    format_crawl_summary, format_validation_report, print_statistics, read_snapshot, write_json,
    CatalogSnapshot, CrawlStatistics,
};
use sumi_catalog::Coordinator;
use tracing_subscriber::EnvFilter;

/// Sumi-Catalog: driver-driven catalog extraction
///
/// A driver is a small TOML or JSON file of CSS selectors describing how
/// one site lists its titles and their episodes. Sumi-Catalog applies it
/// to live pages and writes the result as JSON.
#[derive(Parser, Debug)]
#[command(name = "sumi-catalog")]
#[command(version)]
#[command(about = "Driver-driven catalog extraction", long_about = None)]
struct Cli {
    /// Path to the driver file (.toml or .json)
    #[arg(value_name = "DRIVER")]
    driver: PathBuf,

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
    /// Load and lint the driver without touching the network
    Check,

    /// Crawl the catalog page and write the entries as JSON
    Crawl {
        /// Catalog page to crawl instead of the driver's baseUrl
        #[arg(long)]
        url: Option<String>,

        /// Where to write the snapshot (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also fetch every entry page and extract its sub-entries
        #[arg(long)]
        episodes: bool,

        /// Previous snapshot whose ids and sub-entries are carried over
        #[arg(long, value_name = "SNAPSHOT")]
        previous: Option<PathBuf>,

        /// Entry pages fetched at once with --episodes
        #[arg(long, default_value_t = 4)]
        concurrency: usize,

        /// Write a markdown summary of the crawl to this path
        #[arg(long, value_name = "PATH")]
        summary: Option<PathBuf>,
    },

    /// Extract the sub-entries of one entry page
    Episodes {
        /// Absolute URL of the entry page
        entry_url: String,
    },

    /// List video and external links on one sub-entry page
    Links {
        /// Absolute URL of the sub-entry page
        sub_entry_url: String,
    },

    /// Probe the driver's selectors against live pages
    Validate {
        /// Catalog page to start from instead of the driver's baseUrl
        #[arg(long)]
        url: Option<String>,

        /// Print the raw result as JSON instead of a markdown report
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate the driver
    tracing::info!("Loading driver from: {}", cli.driver.display());
    let (config, config_hash) = match load_config_with_hash(&cli.driver) {
        Ok((cfg, hash)) => {
            tracing::info!("Driver {} loaded (hash: {})", cfg.driver.id, hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load driver: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Command::Check => handle_check(&config, &config_hash),
        Command::Crawl {
            url,
            output,
            episodes,
            previous,
            concurrency,
            summary,
        } => {
            let options = CrawlOptions {
                url,
                output,
                episodes,
                previous,
                concurrency,
                summary,
            };
            handle_crawl(config, config_hash, options).await
        }
        Command::Episodes { entry_url } => handle_episodes(config, &entry_url).await,
        Command::Links { sub_entry_url } => handle_links(config, &sub_entry_url).await,
        Command::Validate { url, json } => handle_validate(config, url.as_deref(), json).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so JSON on stdout stays clean.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_catalog=info,warn"),
            1 => EnvFilter::new("sumi_catalog=debug,info"),
            2 => EnvFilter::new("sumi_catalog=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles `check`: prints the driver and its lint warnings
fn handle_check(config: &Config, config_hash: &str) -> Result<(), Box<dyn std::error::Error>> {
    let driver = &config.driver;

    println!("=== Sumi-Catalog Driver Check ===\n");
    println!("Driver: {} ({})", driver.display_name(), driver.id);
    println!("  Version: {}", driver.version);
    if let Some(author) = &driver.author {
        println!("  Author: {}", author);
    }
    println!("  Domain: {}", driver.domain);
    println!("  Base URL: {}", driver.config.base_url);
    println!("  Hash: {}", config_hash);

    println!("\nFetch:");
    println!("  User agent: {}", config.fetch.user_agent);
    println!(
        "  Timeout: {}s (connect {}s)",
        config.fetch.timeout_secs, config.fetch.connect_timeout_secs
    );

    let configured = driver.config.selectors.configured_roles();
    println!("\nSelectors ({}):", configured.len());
    for role in configured {
        if let Some(selector) = driver.config.selectors.get(role) {
            println!("  {:<22} {}", role.as_str(), selector);
        }
    }

    if let Some(pagination) = &driver.config.pagination {
        println!("\nPagination hints (not followed):");
        if let Some(next) = &pagination.next_page_selector {
            println!("  nextPageSelector: {}", next);
        }
        if let Some(param) = &pagination.page_param {
            println!("  pageParam: {}", param);
        }
    }

    let warnings = lint_driver(driver);
    if warnings.is_empty() {
        println!("\n✓ Driver is valid");
    } else {
        println!("\nWarnings ({}):", warnings.len());
        for warning in warnings {
            println!("  - {}", warning);
        }
    }

    Ok(())
}

struct CrawlOptions {
    url: Option<String>,
    output: Option<PathBuf>,
    episodes: bool,
    previous: Option<PathBuf>,
    concurrency: usize,
    summary: Option<PathBuf>,
}

/// Handles `crawl`: catalog page, optional sub-entries, snapshot output
async fn handle_crawl(
    config: Config,
    config_hash: String,
    options: CrawlOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = Coordinator::from_config(config)?;

    let result = coordinator
        .crawl(options.url.as_deref(), |message, fraction| {
            tracing::info!("[{:>3.0}%] {}", fraction * 100.0, message);
        })
        .await;

    if result.fetch_failed() {
        for error in &result.errors {
            tracing::error!("{}", error);
        }
        return Err(format!("crawl of driver {} failed", coordinator.driver().id).into());
    }

    let mut entries = result.entries;
    let mut errors = result.errors;

    if let Some(path) = &options.previous {
        let previous = read_snapshot(path)?;
        if previous.driver_id != coordinator.driver().id {
            tracing::warn!(
                "Snapshot {} belongs to driver {}, not {}",
                path.display(),
                previous.driver_id,
                coordinator.driver().id
            );
        }
        let matched = carry_over_sub_entries(&mut entries, previous.entries);
        tracing::info!("Carried over {} entries from {}", matched, path.display());
    }

    if options.episodes {
        let (populated, sub_errors) = coordinator
            .populate_sub_entries(entries, options.concurrency)
            .await;
        entries = populated;
        errors.extend(sub_errors);
    }

    let stats = CrawlStatistics::collect(&entries, &errors);
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();

    if let Some(path) = &options.summary {
        let markdown = format_crawl_summary(coordinator.driver(), &stats, &messages);
        std::fs::write(path, markdown)?;
        tracing::info!("Summary written to {}", path.display());
    }

    let snapshot = CatalogSnapshot {
        driver_id: coordinator.driver().id.clone(),
        driver_version: coordinator.driver().version.clone(),
        config_hash,
        crawled_at: Utc::now(),
        entries,
        errors: messages,
    };

    match &options.output {
        Some(path) => {
            write_json(&snapshot, path)?;
            print_statistics(&stats);
            println!("\n✓ Snapshot written to: {}", path.display());
        }
        None => print_json(&snapshot)?,
    }

    Ok(())
}

/// Handles `episodes`: sub-entries of one entry page
async fn handle_episodes(
    config: Config,
    entry_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = Coordinator::from_config(config)?;

    let result = coordinator.sub_entries(entry_url, Vec::new()).await;
    for error in &result.errors {
        tracing::warn!("{}", error);
    }

    print_json(&result)
}

/// Handles `links`: player and external links of one sub-entry page
async fn handle_links(
    config: Config,
    sub_entry_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = Coordinator::from_config(config)?;
    let links = coordinator.player_links(sub_entry_url).await?;
    print_json(&links)
}

/// Handles `validate`: the three-page probe
async fn handle_validate(
    config: Config,
    url: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = Coordinator::from_config(config)?;
    let result = coordinator.validate(url).await;

    if json {
        print_json(&result)?;
    } else {
        print!("{}", format_validation_report(coordinator.driver(), &result));
    }

    if !result.is_valid() {
        tracing::warn!("Validation stopped early: {}", result.error_messages().join("; "));
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
