//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Validating the seed before any network activity
//! - Loading the site's robots.txt once
//! - Managing the frontier queue
//! - Coordinating fetching, parsing, identifier and link extraction
//! - Politeness delays and interrupt handling
//! - Assembling the final report

use crate::config::{validate, Config};
use crate::crawler::extractor::IdentifierSet;
use crate::crawler::parser::parse_html;
use crate::crawler::scheduler::{FrontierEntry, Scheduler};
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::output::{CrawlStatistics, EmailFile, IdentifierSink};
use crate::robots::RobotsGate;
use crate::state::{FailureReason, PageOutcome, SkipReason};
use crate::url::{canonicalize, extract_domain, has_non_html_extension, is_same_site, parse_seed};
use crate::{MailsiftError, Result};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Number of fetched pages between progress log lines
const PROGRESS_INTERVAL: usize = 10;

/// Everything a finished (or interrupted) crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The canonical seed URL
    pub seed: Url,

    /// Successfully fetched pages, in fetch order
    pub discovered_pages: Vec<Url>,

    /// Addresses found in this run, in first-seen order
    pub emails: Vec<String>,

    /// Per-outcome counters and timestamps
    pub stats: CrawlStatistics,

    /// True if the crawl was stopped by an interrupt
    pub interrupted: bool,
}

/// Main crawler coordinator structure
///
/// Owns all mutable crawl state; nothing is shared or global.
pub struct Coordinator {
    config: Config,
    client: Client,
    scheduler: Scheduler,
    robots: RobotsGate,
    seed: Url,
    site_domain: String,
    delay: Duration,
    discovered: Vec<Url>,
    emails: IdentifierSet,
    sink: Box<dyn IdentifierSink + Send>,
    stats: CrawlStatistics,
}

impl Coordinator {
    /// Creates a new coordinator writing addresses to the configured file
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `seed` - Absolute http(s) URL the crawl starts from
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(MailsiftError)` - Invalid seed or configuration, or the output
    ///   file could not be opened. No request has been sent.
    pub fn new(config: Config, seed: &str) -> Result<Self> {
        let seed = checked_seed(seed)?;
        validate(&config)?;
        let sink = EmailFile::open(&config.output.emails_path)?;
        Self::build(config, seed, Box::new(sink))
    }

    /// Creates a new coordinator writing addresses to `sink`
    pub fn with_sink(
        config: Config,
        seed: &str,
        sink: Box<dyn IdentifierSink + Send>,
    ) -> Result<Self> {
        let seed = checked_seed(seed)?;
        validate(&config)?;
        Self::build(config, seed, sink)
    }

    fn build(config: Config, seed: Url, sink: Box<dyn IdentifierSink + Send>) -> Result<Self> {
        let site_domain = extract_domain(&seed).ok_or_else(|| MailsiftError::InvalidSeed {
            url: seed.to_string(),
            reason: "no host".to_string(),
        })?;

        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout),
        )?;

        let scheduler = Scheduler::new(config.crawler.max_pages, config.crawler.max_depth);
        let robots = RobotsGate::new(
            config.crawler.robots_mode,
            config.user_agent.crawler_name.clone(),
        );
        let delay = Duration::from_secs_f64(config.crawler.delay);

        Ok(Self {
            config,
            client,
            scheduler,
            robots,
            seed,
            site_domain,
            delay,
            discovered: Vec::new(),
            emails: IdentifierSet::new(),
            sink,
            stats: CrawlStatistics::new(),
        })
    }

    /// The canonical seed URL
    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// The host every discovered page belongs to
    pub fn site_domain(&self) -> &str {
        &self.site_domain
    }

    /// Runs the crawl until the frontier empties, the page bound is hit, or
    /// Ctrl-C is pressed
    pub async fn run(self) -> Result<CrawlReport> {
        self.run_until(interrupt_signal()).await
    }

    /// Runs the crawl, stopping early when `shutdown` completes
    ///
    /// `shutdown` is raced against every fetch and every politeness sleep.
    /// Pages and addresses recorded before it fires are kept in the report.
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<CrawlReport>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut interrupted = false;

        tracing::info!(
            "Starting crawl of {} (max {} pages, depth {}, delay {:?})",
            self.seed,
            self.config.crawler.max_pages,
            self.config.crawler.max_depth,
            self.delay
        );

        tokio::select! {
            _ = self.load_robots() => {}
            _ = &mut shutdown => {
                tracing::warn!("Interrupted while fetching robots.txt");
                return self.finish(true);
            }
        }
        self.apply_crawl_delay();

        self.scheduler.enqueue(self.seed.clone(), 0);

        while !self.scheduler.page_limit_reached(self.discovered.len()) {
            let Some(entry) = self.scheduler.dequeue() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            tracing::debug!("Processing URL: {} (depth {})", entry.url, entry.depth);

            let outcome = tokio::select! {
                outcome = self.process_entry(&entry) => outcome?,
                _ = &mut shutdown => {
                    tracing::warn!("Interrupted while processing {}", entry.url);
                    interrupted = true;
                    break;
                }
            };

            debug_assert!(!outcome.marks_visited() || self.scheduler.is_visited(&entry.url));
            self.log_outcome(&entry, &outcome);
            self.stats.record(&outcome);

            if !outcome.is_success() {
                continue;
            }

            if self.discovered.len() % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    "Progress: {} pages crawled, {} URLs visited, {} in frontier, {} addresses, {:.2} pages/sec",
                    self.discovered.len(),
                    self.scheduler.visited_count(),
                    self.scheduler.frontier_size(),
                    self.emails.len(),
                    self.discovered.len() as f64 / self.stats.duration_seconds().max(0.001)
                );
            }

            let more_to_do = !self.scheduler.is_empty()
                && !self.scheduler.page_limit_reached(self.discovered.len());
            if more_to_do && !self.delay.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(self.delay) => {}
                    _ = &mut shutdown => {
                        tracing::warn!("Interrupted during politeness delay");
                        interrupted = true;
                        break;
                    }
                }
            }
        }

        if self.scheduler.page_limit_reached(self.discovered.len()) {
            tracing::info!(
                "Page limit of {} reached, {} URLs left in frontier",
                self.config.crawler.max_pages,
                self.scheduler.frontier_size()
            );
        }

        self.finish(interrupted)
    }

    /// Processes a single frontier entry
    ///
    /// This method:
    /// 1. Drops duplicates, otherwise marks the URL visited
    /// 2. Applies the depth, extension and robots gates
    /// 3. Fetches the page, dropping it if a redirect left the site
    /// 4. Records new addresses (each one persisted before continuing)
    /// 5. Enqueues same-site links when the depth allows expansion
    ///
    /// Only an output failure is returned as an error; every fetch problem is
    /// a [`PageOutcome::Failed`].
    pub async fn process_entry(&mut self, entry: &FrontierEntry) -> Result<PageOutcome> {
        let url = &entry.url;

        if self.scheduler.is_visited(url) {
            return Ok(PageOutcome::Skipped(SkipReason::AlreadyVisited));
        }
        self.scheduler.mark_visited(url);

        if self.scheduler.exceeds_depth(entry.depth) {
            return Ok(PageOutcome::Skipped(SkipReason::DepthExceeded));
        }

        if has_non_html_extension(url) {
            return Ok(PageOutcome::Skipped(SkipReason::NonHtmlExtension));
        }

        if !self.robots.allowed(url) {
            return Ok(PageOutcome::Skipped(SkipReason::RobotsDisallowed));
        }

        let (final_url, body) = match fetch_url(&self.client, url).await {
            FetchResult::Success {
                final_url,
                status_code,
                content_type,
                body,
            } => {
                tracing::debug!("{} answered {} ({})", url, status_code, content_type);
                (final_url, body)
            }
            FetchResult::ContentMismatch { content_type } => {
                tracing::debug!("{} is {:?}, not HTML", url, content_type);
                return Ok(PageOutcome::Skipped(SkipReason::NonHtmlContent));
            }
            FetchResult::HttpError { status_code } => {
                return Ok(PageOutcome::Failed(FailureReason::HttpStatus(status_code)));
            }
            FetchResult::NetworkError { error } => {
                return Ok(PageOutcome::Failed(FailureReason::Network(error)));
            }
        };

        if final_url.as_str() != url.as_str() {
            if !is_same_site(&final_url, &self.site_domain) {
                tracing::debug!("{} redirected off site to {}", url, final_url);
                return Ok(PageOutcome::Skipped(SkipReason::OffSiteRedirect));
            }
            tracing::debug!("{} redirected to {}", url, final_url);
            self.scheduler.mark_visited(&canonicalize(&final_url));
        }

        let parsed = parse_html(
            &body,
            &final_url,
            &self.site_domain,
            &self.config.extraction.data_attribute,
        );

        let mut new_emails = 0;
        for email in &parsed.emails {
            if self.emails.insert(email) {
                self.sink.record_email(email)?;
                tracing::info!("Found address {} on {}", email, url);
                new_emails += 1;
            }
        }

        let mut new_links = 0;
        if self.scheduler.should_expand(entry.depth) {
            for link in parsed.links {
                if self.scheduler.enqueue(link, entry.depth + 1) {
                    new_links += 1;
                }
            }
        }

        self.discovered.push(url.clone());

        Ok(PageOutcome::Fetched {
            new_links,
            new_emails,
        })
    }

    /// Fetches the site's robots.txt into the gate
    async fn load_robots(&mut self) {
        let timeout = Duration::from_secs(self.config.crawler.robots_timeout);
        let policy = self.robots.load(&self.client, &self.seed, timeout).await;
        if !policy.is_unrestricted() {
            tracing::info!("Loaded robots.txt rules for {}", self.site_domain);
        }
    }

    /// Raises the politeness delay to the site's robots Crawl-delay
    fn apply_crawl_delay(&mut self) {
        if let Some(crawl_delay) = self.robots.crawl_delay(&self.site_domain) {
            if crawl_delay > self.delay {
                tracing::info!(
                    "robots.txt Crawl-delay {:?} exceeds configured delay, using it",
                    crawl_delay
                );
                self.delay = crawl_delay;
            }
        }
    }

    fn log_outcome(&self, entry: &FrontierEntry, outcome: &PageOutcome) {
        match outcome {
            PageOutcome::Fetched { .. } => {
                tracing::info!("[{}] {} {}", self.discovered.len(), entry.url, outcome)
            }
            PageOutcome::Skipped(_) => tracing::debug!("{} {}", entry.url, outcome),
            PageOutcome::Failed(_) => tracing::warn!("{} {}", entry.url, outcome),
        }
    }

    fn finish(mut self, interrupted: bool) -> Result<CrawlReport> {
        self.sink.finalize()?;
        self.stats.finish();

        tracing::info!(
            "Crawl {}: {} pages crawled, {} new addresses in {:.1}s",
            if interrupted { "interrupted" } else { "completed" },
            self.discovered.len(),
            self.emails.len(),
            self.stats.duration_seconds()
        );

        Ok(CrawlReport {
            seed: self.seed,
            discovered_pages: self.discovered,
            emails: self.emails.into_vec(),
            stats: self.stats,
            interrupted,
        })
    }
}

fn checked_seed(seed: &str) -> Result<Url> {
    parse_seed(seed).map_err(|e| MailsiftError::InvalidSeed {
        url: seed.to_string(),
        reason: e.to_string(),
    })
}

/// Completes on Ctrl-C; never completes if the handler cannot be installed
async fn interrupt_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Runs a complete crawl of the site `seed` belongs to
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - Absolute http(s) URL the crawl starts from
///
/// # Example
///
/// ```no_run
/// use mailsift::config::Config;
/// use mailsift::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl(Config::default(), "https://example.com/").await?;
/// println!("{} addresses", report.emails.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config, seed: &str) -> Result<CrawlReport> {
    Coordinator::new(config, seed)?.run().await
}
