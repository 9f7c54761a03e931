//! Output module for persisting and reporting crawl results
//!
//! This module handles:
//! - Appending confirmed addresses to the identifier file
//! - Reading that file back as recipient records for a mailer
//! - Recording crawl statistics

mod email_file;
mod recipients;
pub mod stats;
mod traits;

pub use email_file::EmailFile;
pub use recipients::{filter_recipients, load_recipients, name_from_email, Recipient};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{IdentifierSink, MemorySink, OutputError, OutputResult};
