//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageOutcome`: what happened to one dequeued frontier entry
//! - `SkipReason` / `FailureReason`: the explicit skip and failure branches

mod page_state;

// Re-export main types
pub use page_state::{FailureReason, PageOutcome, SkipReason};
