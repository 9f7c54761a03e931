//! Crawl statistics collected during a run
//!
//! This module provides the per-outcome counters the coordinator updates after
//! every frontier entry, and a printer for the end-of-run summary.

use crate::state::{FailureReason, PageOutcome, SkipReason};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run ended (None while running)
    pub finished_at: Option<DateTime<Utc>>,

    /// Pages fetched and processed
    pub pages_fetched: u64,

    /// Count of skipped entries by reason
    pub skipped: HashMap<SkipReason, u64>,

    /// Count of failures by HTTP status code
    pub http_failures: HashMap<u16, u64>,

    /// Number of network-level failures
    pub network_failures: u64,

    /// Links added to the frontier
    pub links_enqueued: u64,

    /// Addresses first seen in this run
    pub emails_found: u64,
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlStatistics {
    /// Creates empty statistics starting now
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_fetched: 0,
            skipped: HashMap::new(),
            http_failures: HashMap::new(),
            network_failures: 0,
            links_enqueued: 0,
            emails_found: 0,
        }
    }

    /// Updates the counters for one processed entry
    pub fn record(&mut self, outcome: &PageOutcome) {
        match outcome {
            PageOutcome::Fetched {
                new_links,
                new_emails,
            } => {
                self.pages_fetched += 1;
                self.links_enqueued += *new_links as u64;
                self.emails_found += *new_emails as u64;
            }
            PageOutcome::Skipped(reason) => {
                *self.skipped.entry(*reason).or_insert(0) += 1;
            }
            PageOutcome::Failed(FailureReason::HttpStatus(code)) => {
                *self.http_failures.entry(*code).or_insert(0) += 1;
            }
            PageOutcome::Failed(FailureReason::Network(_)) => {
                self.network_failures += 1;
            }
        }
    }

    /// Marks the run as finished now
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Number of skipped entries for one reason
    pub fn skipped_for(&self, reason: SkipReason) -> u64 {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    pub fn total_skipped(&self) -> u64 {
        self.skipped.values().sum()
    }

    pub fn total_failed(&self) -> u64 {
        self.http_failures.values().sum::<u64>() + self.network_failures
    }

    /// Total entries taken off the frontier
    pub fn total_processed(&self) -> u64 {
        self.pages_fetched + self.total_skipped() + self.total_failed()
    }

    /// Elapsed seconds, up to now if the run is still going
    pub fn duration_seconds(&self) -> f64 {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_milliseconds().max(0) as f64 / 1000.0
    }

    /// Returns the fetch success rate as a percentage of fetch attempts
    pub fn success_rate(&self) -> f64 {
        let attempts = self.pages_fetched + self.total_failed();
        if attempts == 0 {
            return 0.0;
        }
        (self.pages_fetched as f64 / attempts as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Started:  {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    println!("  Duration: {:.1}s", stats.duration_seconds());
    println!("  Entries processed: {}", stats.total_processed());
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!("  Links enqueued: {}", stats.links_enqueued);
    println!("  New addresses: {}", stats.emails_found);
    println!();

    if stats.total_skipped() > 0 {
        println!("Skipped:");
        for reason in SkipReason::all() {
            let count = stats.skipped_for(reason);
            if count > 0 {
                println!("  {}: {}", reason, count);
            }
        }
        println!();
    }

    if stats.total_failed() > 0 {
        println!("Failures:");
        let mut codes: Vec<_> = stats.http_failures.iter().collect();
        codes.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (code, count) in codes {
            println!("  HTTP {}: {}", code, count);
        }
        if stats.network_failures > 0 {
            println!("  network: {}", stats.network_failures);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} fetch attempts)",
        stats.success_rate(),
        stats.pages_fetched,
        stats.pages_fetched + stats.total_failed()
    );
}
