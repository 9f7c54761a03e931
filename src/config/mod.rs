//! Configuration module for Mailsift
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All keys have defaults, so a missing file section simply means "use the default".
//!
//! # Example
//!
//! ```no_run
//! use mailsift::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mailsift.toml")).unwrap();
//! println!("Crawler will fetch at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ExtractionConfig, OutputConfig, RobotsMode, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::{validate, MAX_DELAY_SECS};
