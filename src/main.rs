//! Mailsift main entry point
//!
//! This is the command-line interface for the Mailsift contact harvester.

use anyhow::{Context, Result};
use clap::Parser;
use mailsift::config::{load_config_with_hash, validate, Config, RobotsMode};
use mailsift::crawler::Coordinator;
use mailsift::output::{filter_recipients, load_recipients, print_statistics};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Mailsift: a polite single-site contact harvester
///
/// Mailsift crawls one website breadth-first, honouring robots.txt and a
/// politeness delay, and appends every email address it finds to a file.
#[derive(Parser, Debug)]
#[command(name = "mailsift")]
#[command(version)]
#[command(about = "A polite single-site contact harvester", long_about = None)]
struct Cli {
    /// Absolute http(s) URL to start crawling from
    #[arg(value_name = "SEED", required_unless_present = "recipients")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages to fetch
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Maximum link distance from the seed
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Seconds to wait after each fetched page
    #[arg(long, value_name = "SECS")]
    delay: Option<f64>,

    /// File the addresses are appended to
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Skip URLs robots.txt disallows instead of only logging them
    #[arg(long)]
    strict_robots: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "recipients")]
    dry_run: bool,

    /// Print the recipients stored in the output file and exit
    #[arg(long, conflicts_with = "dry_run")]
    recipients: bool,

    /// With --recipients: keep only addresses on this domain
    #[arg(long, value_name = "DOMAIN", requires = "recipients")]
    only_domain: Option<String>,

    /// With --recipients: drop addresses on this domain (repeatable)
    #[arg(long, value_name = "DOMAIN", requires = "recipients")]
    exclude_domain: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    // Handle different modes
    if cli.recipients {
        handle_recipients(&config, cli.only_domain.as_deref(), &cli.exclude_domain)
    } else if cli.dry_run {
        handle_dry_run(&config, cli.seed.as_deref().unwrap_or_default())
    } else {
        handle_crawl(config, cli.seed.as_deref().unwrap_or_default()).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mailsift=info,warn"),
            1 => EnvFilter::new("mailsift=debug,info"),
            2 => EnvFilter::new("mailsift=trace,debug"),
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

/// Loads the config file (if any) and layers CLI flags over it
fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(delay) = cli.delay {
        config.crawler.delay = delay;
    }
    if let Some(output) = &cli.output {
        config.output.emails_path = output.clone();
    }
    if cli.strict_robots {
        config.crawler.robots_mode = RobotsMode::Strict;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, seed: &str) -> Result<()> {
    // Validates the seed without sending any request
    let coordinator = Coordinator::with_sink(
        config.clone(),
        seed,
        Box::new(mailsift::output::MemorySink::new()),
    )?;

    println!("=== Mailsift Dry Run ===\n");

    println!("Seed:");
    println!("  URL: {}", coordinator.seed());
    println!("  Site: {}", coordinator.site_domain());

    println!("\nCrawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Delay: {}s", config.crawler.delay);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Robots timeout: {}s", config.crawler.robots_timeout);
    println!("  Robots mode: {:?}", config.crawler.robots_mode);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nExtraction:");
    println!("  Data attribute: {}", config.extraction.data_attribute);

    println!("\nOutput:");
    println!("  Emails: {}", config.output.emails_path);

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --recipients mode: prints the records a mailer would receive
fn handle_recipients(
    config: &Config,
    only_domain: Option<&str>,
    exclude_domains: &[String],
) -> Result<()> {
    let path = &config.output.emails_path;
    let recipients = load_recipients(path)
        .with_context(|| format!("Failed to read recipients from {}", path))?;
    let total = recipients.len();
    let recipients = filter_recipients(recipients, only_domain, exclude_domains);

    for recipient in &recipients {
        println!("{}\t{}\t(line {})", recipient.email, recipient.name, recipient.line);
    }
    println!("\n{} of {} recipients selected", recipients.len(), total);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, seed: &str) -> Result<()> {
    let emails_path = config.output.emails_path.clone();
    let coordinator = Coordinator::new(config, seed)?;

    // Run the crawler
    let report = match coordinator.run().await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    println!();
    print_statistics(&report.stats);
    println!();
    println!(
        "{} pages crawled, {} addresses found this run, written to {}",
        report.discovered_pages.len(),
        report.emails.len(),
        emails_path
    );
    if report.interrupted {
        println!("Crawl was interrupted; results are partial.");
    }

    Ok(())
}
