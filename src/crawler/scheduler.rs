//! Scheduler for the breadth-first crawl frontier
//!
//! This module handles:
//! - FIFO ordering of URLs to crawl
//! - The visited set (append-only for a run)
//! - Depth and page-count limits

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL queued for fetching with its discovery depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The canonical URL to fetch
    pub url: Url,

    /// Link distance from the seed at enqueue time (seed = 0)
    pub depth: u32,
}

/// Scheduler manages the frontier queue and the visited set
///
/// Entries are served first-in first-out, so pages are visited in order of
/// their discovered depth. A URL is enqueued at most once: while it waits in
/// the queue it is tracked in `queued`, and after it is dequeued and processed
/// it is recorded in `visited`.
#[derive(Debug)]
pub struct Scheduler {
    /// FIFO queue of URLs to fetch
    frontier: VecDeque<FrontierEntry>,

    /// Keys of URLs currently waiting in `frontier`
    queued: HashSet<String>,

    /// Keys of URLs already processed this run
    visited: HashSet<String>,

    /// Stop dequeuing once this many pages have been discovered
    max_pages: usize,

    /// Entries deeper than this are never fetched
    max_depth: u32,
}

impl Scheduler {
    /// Creates a new scheduler with an empty frontier
    ///
    /// # Arguments
    ///
    /// * `max_pages` - Maximum number of successfully fetched pages
    /// * `max_depth` - Maximum link distance from the seed
    pub fn new(max_pages: usize, max_depth: u32) -> Self {
        Self {
            frontier: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            max_pages,
            max_depth,
        }
    }

    /// Adds a URL to the back of the frontier
    ///
    /// # Returns
    ///
    /// * `true` - The URL was enqueued
    /// * `false` - The URL was already visited or is already waiting
    pub fn enqueue(&mut self, url: Url, depth: u32) -> bool {
        let key = url.as_str();
        if self.visited.contains(key) || self.queued.contains(key) {
            return false;
        }

        self.queued.insert(key.to_string());
        self.frontier.push_back(FrontierEntry { url, depth });
        true
    }

    /// Removes and returns the entry at the front of the frontier
    ///
    /// # Returns
    ///
    /// * `Some(FrontierEntry)` - The next entry to process
    /// * `None` - The frontier is empty
    pub fn dequeue(&mut self) -> Option<FrontierEntry> {
        let entry = self.frontier.pop_front()?;
        self.queued.remove(entry.url.as_str());
        Some(entry)
    }

    /// Records a URL as processed; it can never be enqueued again this run
    pub fn mark_visited(&mut self, url: &Url) {
        self.visited.insert(url.as_str().to_string());
    }

    /// Returns whether a URL has been processed this run
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Returns true if an entry at `depth` must not be fetched
    pub fn exceeds_depth(&self, depth: u32) -> bool {
        depth > self.max_depth
    }

    /// Returns true if links found at `depth` should be enqueued
    ///
    /// Links are only followed from pages strictly shallower than the limit,
    /// so the frontier never holds entries that could not be fetched.
    pub fn should_expand(&self, depth: u32) -> bool {
        depth < self.max_depth
    }

    /// Returns true once `discovered` pages reach the page budget
    pub fn page_limit_reached(&self, discovered: usize) -> bool {
        discovered >= self.max_pages
    }

    /// Returns the number of URLs in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Returns the number of URLs processed so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
