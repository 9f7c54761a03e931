//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with content-type gating
//! - HTML parsing, link extraction and email extraction
//! - The breadth-first frontier
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{crawl, Coordinator, CrawlReport};
pub use extractor::{extract_emails, is_valid_email, IdentifierSet};
pub use fetcher::{build_http_client, fetch_url, is_html_content_type, FetchResult, MAX_REDIRECTS};
pub use parser::{parse_html, ParsedPage};
pub use scheduler::{FrontierEntry, Scheduler};
