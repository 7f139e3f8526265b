//! Sumi-Sitemap main entry point
//!
//! This is the command-line interface for the Sumi-Sitemap generator.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::{Path, PathBuf};
use sumi_sitemap::config::{self, load_config, Config};
use sumi_sitemap::crawler::crawl_with_config;
use sumi_sitemap::sitemap::{serialize, validate};
use sumi_sitemap::url::parse_seed_url;
use tracing_subscriber::EnvFilter;

/// Sumi-Sitemap: a single-site sitemap generator
///
/// Sumi-Sitemap crawls one website from a seed URL, follows same-domain links
/// up to a maximum depth, and writes a sitemap.xml following the sitemaps.org
/// protocol.
#[derive(Parser, Debug)]
#[command(name = "sumi-sitemap")]
#[command(version)]
#[command(about = "A single-site sitemap generator", long_about = None)]
struct Cli {
    /// Seed URL of the site to crawl (http or https)
    #[arg(value_name = "WEBSITE_URL", required_unless_present = "validate")]
    website_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of link hops from the seed URL
    #[arg(short = 'd', long)]
    max_depth: Option<u32>,

    /// Do not record embedded images
    #[arg(long)]
    no_images: bool,

    /// Politeness delay between requests, in milliseconds
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Where to write the sitemap; `-` writes to stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Validate an existing sitemap file and exit
    #[arg(long, value_name = "FILE", conflicts_with = "dry_run")]
    validate: Option<PathBuf>,

    /// Show the effective configuration without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Loads the config file (if any) and applies command-line overrides
    fn effective_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path.display());
                load_config(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?
            }
            None => Config::default(),
        };

        if let Some(max_depth) = self.max_depth {
            config.crawler.max_depth = max_depth;
        }
        if self.no_images {
            config.crawler.include_images = false;
        }
        if let Some(delay) = self.delay {
            config.crawler.request_delay = delay;
        }
        if let Some(output) = &self.output {
            config.output.sitemap_path = output.clone();
        }

        config::validate(&config)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Some(path) = &cli.validate {
        return handle_validate(path);
    }

    let config = cli.effective_config()?;
    let website_url = cli
        .website_url
        .as_deref()
        .context("WEBSITE_URL is required")?;

    if cli.dry_run {
        handle_dry_run(website_url, &config)
    } else {
        handle_crawl(website_url, &config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so the sitemap can be written to stdout.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_sitemap=info,warn"),
            1 => EnvFilter::new("sumi_sitemap=debug,info"),
            2 => EnvFilter::new("sumi_sitemap=trace,debug"),
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

/// Handles the --validate mode: checks an existing sitemap document
fn handle_validate(path: &Path) -> anyhow::Result<()> {
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    match validate(&xml) {
        Ok(count) => {
            println!("✓ {} is a valid sitemap with {} URLs", path.display(), count);
            Ok(())
        }
        Err(e) => bail!("{} is not a valid sitemap: {}", path.display(), e),
    }
}

/// Handles the --dry-run mode: validates inputs and shows what would be crawled
fn handle_dry_run(website_url: &str, config: &Config) -> anyhow::Result<()> {
    let seed = parse_seed_url(website_url)?;

    println!("=== Sumi-Sitemap Dry Run ===\n");
    println!("Seed URL: {}", seed);

    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Include images: {}", config.crawler.include_images);
    println!("  Request delay: {}ms", config.crawler.request_delay);
    if config.crawler.max_pages > 0 {
        println!("  Max pages: {}", config.crawler.max_pages);
    } else {
        println!("  Max pages: unlimited");
    }

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Request timeout: {}s", config.http.request_timeout);
    println!("  HEAD timeout: {}s", config.http.head_timeout);
    println!("  Max redirects: {}", config.http.max_redirects);

    println!("\nOutput:");
    println!("  Sitemap: {}", config.output.sitemap_path);

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(website_url: &str, config: &Config) -> anyhow::Result<()> {
    let entries = match crawl_with_config(website_url, config).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if entries.is_empty() {
        bail!("No pages found for {}", website_url);
    }

    let xml = serialize(&entries)?;
    let path = &config.output.sitemap_path;

    if path == "-" {
        print!("{}", xml);
    } else {
        std::fs::write(path, &xml).with_context(|| format!("Failed to write {}", path))?;
        tracing::info!("Wrote {} URLs to {}", entries.len(), path);
    }

    Ok(())
}
