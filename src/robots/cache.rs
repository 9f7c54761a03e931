//! Per-run robots.txt cache and allowance gate
//!
//! Each domain's policy is fetched at most once per run and kept here for the
//! rest of the crawl.

use crate::config::{RobotsMode, MAX_DELAY_SECS};
use crate::robots::{fetch_robots, RobotsPolicy};
use crate::url::extract_domain;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Decides whether URLs may be fetched, one cached policy per domain
#[derive(Debug)]
pub struct RobotsGate {
    mode: RobotsMode,
    product_token: String,
    policies: HashMap<String, RobotsPolicy>,
}

impl RobotsGate {
    /// Creates an empty gate
    ///
    /// # Arguments
    ///
    /// * `mode` - Whether a negative verdict is enforced or only logged
    /// * `product_token` - The name matched against `User-agent` groups
    pub fn new(mode: RobotsMode, product_token: impl Into<String>) -> Self {
        Self {
            mode,
            product_token: product_token.into(),
            policies: HashMap::new(),
        }
    }

    /// Returns the policy for `origin`'s domain, fetching it on first use
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client to use
    /// * `origin` - Any URL on the site; only scheme and authority are used
    /// * `timeout` - Upper bound for the robots.txt request
    pub async fn load(&mut self, client: &Client, origin: &Url, timeout: Duration) -> &RobotsPolicy {
        let domain = extract_domain(origin).unwrap_or_default();

        if !self.policies.contains_key(&domain) {
            let policy = fetch_robots(client, origin, timeout).await;
            self.policies.insert(domain.clone(), policy);
        } else {
            tracing::debug!("Using cached robots.txt for domain: {}", domain);
        }

        &self.policies[&domain]
    }

    /// Stores a policy without fetching (e.g. one obtained elsewhere)
    pub fn insert(&mut self, domain: &str, policy: RobotsPolicy) {
        self.policies.insert(domain.to_lowercase(), policy);
    }

    /// Decides whether `url` may be fetched
    ///
    /// Domains without a loaded policy are allowed. In
    /// [`RobotsMode::Permissive`] a disallow verdict is logged and then
    /// overridden, so this only returns `false` in [`RobotsMode::Strict`].
    pub fn allowed(&self, url: &Url) -> bool {
        let Some(policy) = extract_domain(url).and_then(|d| self.policies.get(&d)) else {
            return true;
        };

        if policy.is_allowed(url.as_str(), &self.product_token) {
            return true;
        }

        match self.mode {
            RobotsMode::Permissive => {
                tracing::debug!("robots.txt disallows {}, crawling anyway (permissive mode)", url);
                true
            }
            RobotsMode::Strict => {
                tracing::info!("URL {} disallowed by robots.txt", url);
                false
            }
        }
    }

    /// The Crawl-delay declared for this crawler on `domain`, if any
    ///
    /// Values above [`MAX_DELAY_SECS`] are clamped to it.
    pub fn crawl_delay(&self, domain: &str) -> Option<Duration> {
        let secs = self
            .policies
            .get(domain)?
            .crawl_delay(&self.product_token)?;

        if secs > MAX_DELAY_SECS {
            tracing::warn!(
                "robots.txt Crawl-delay of {}s for {} is above {}s, clamping",
                secs,
                domain,
                MAX_DELAY_SECS
            );
            return Some(Duration::from_secs_f64(MAX_DELAY_SECS));
        }

        Duration::try_from_secs_f64(secs).ok()
    }
}
