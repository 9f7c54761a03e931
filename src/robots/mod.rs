//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching
//! robots.txt files, and the gate the crawler consults before each fetch.

mod cache;
mod parser;

pub use cache::RobotsGate;
pub use parser::{RobotsPolicy, MIN_ROBOTS_CONTENT_LEN};

use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Fetches robots.txt for the site `origin` belongs to
///
/// The document is requested from `origin`'s scheme and authority. This never
/// fails: a non-200 answer, a network error, a timeout, or an unreadable body
/// all yield [`RobotsPolicy::Unrestricted`].
///
/// # Arguments
///
/// * `client` - The HTTP client to use (redirects are followed)
/// * `origin` - Any URL on the site
/// * `timeout` - Upper bound for the request
pub async fn fetch_robots(client: &Client, origin: &Url, timeout: Duration) -> RobotsPolicy {
    let robots_url = match origin.join("/robots.txt") {
        Ok(u) => u,
        Err(e) => {
            tracing::debug!("Cannot build robots.txt URL from {}: {}", origin, e);
            return RobotsPolicy::Unrestricted;
        }
    };

    tracing::debug!("Fetching robots.txt: {}", robots_url);

    let response = match client.get(robots_url.clone()).timeout(timeout).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::info!("robots.txt unavailable at {} ({}), no restrictions", robots_url, e);
            return RobotsPolicy::Unrestricted;
        }
    };

    if response.status() != StatusCode::OK {
        tracing::info!(
            "robots.txt at {} returned HTTP {}, no restrictions",
            robots_url,
            response.status().as_u16()
        );
        return RobotsPolicy::Unrestricted;
    }

    match response.text().await {
        Ok(body) => {
            let policy = RobotsPolicy::from_content(&body);
            if policy.is_unrestricted() {
                tracing::info!("robots.txt at {} is too sparse, no restrictions", robots_url);
            }
            policy
        }
        Err(e) => {
            tracing::warn!("Failed to read robots.txt body from {}: {}", robots_url, e);
            RobotsPolicy::Unrestricted
        }
    }
}
