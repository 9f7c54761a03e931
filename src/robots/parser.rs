//! Robots.txt parser implementation
//!
//! Allow/disallow matching is delegated to the robotstxt crate; Crawl-delay is
//! read by a small line scanner since the matcher does not expose it.

use robotstxt::DefaultMatcher;

/// Trimmed robots.txt bodies shorter than this are treated as unrestricted
///
/// A bare `User-agent: *` line is 13 bytes; anything that short carries no
/// usable directive and is assumed to be a misconfiguration.
pub const MIN_ROBOTS_CONTENT_LEN: usize = 20;

/// The crawl policy for one domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotsPolicy {
    /// No robots.txt, an unfetchable one, or one too sparse to mean anything
    Unrestricted,
    /// A robots.txt body to evaluate
    Rules { content: String },
}

impl RobotsPolicy {
    /// Builds a policy from a fetched robots.txt body
    ///
    /// Sparse bodies (see [`MIN_ROBOTS_CONTENT_LEN`]) collapse to
    /// [`RobotsPolicy::Unrestricted`].
    pub fn from_content(content: &str) -> Self {
        let trimmed = content.trim();
        if trimmed.len() < MIN_ROBOTS_CONTENT_LEN {
            return Self::Unrestricted;
        }

        Self::Rules {
            content: trimmed.to_string(),
        }
    }

    /// Returns true for the "no restriction" sentinel
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }

    /// Checks if a URL is allowed for the given product token
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The crawler's product token (e.g. "mailsift")
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Rules { content } => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(content, user_agent, url)
            }
        }
    }

    /// Gets the crawl delay for a specific user agent
    ///
    /// A delay in a group naming the agent wins over one in the `*` group.
    ///
    /// # Returns
    ///
    /// * `Some(f64)` - The crawl delay in seconds
    /// * `None` - If no crawl delay is specified
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        let Self::Rules { content } = self else {
            return None;
        };

        let mut current_user_agents: Vec<String> = Vec::new();
        let mut group_has_rules = false;
        let mut crawl_delay_for_wildcard: Option<f64> = None;
        let mut crawl_delay_for_agent: Option<f64> = None;

        let normalized_agent = user_agent.to_lowercase();

        for line in content.lines() {
            // Strip trailing comments
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    // A user-agent line after rules starts a new group
                    if group_has_rules {
                        current_user_agents.clear();
                        group_has_rules = false;
                    }
                    current_user_agents.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    group_has_rules = true;
                    let Ok(delay) = value.parse::<f64>() else {
                        continue;
                    };
                    if !delay.is_finite() || delay < 0.0 {
                        continue;
                    }

                    if current_user_agents.iter().any(|ua| ua == "*") {
                        crawl_delay_for_wildcard = Some(delay);
                    }
                    if current_user_agents
                        .iter()
                        .any(|ua| ua != "*" && !ua.is_empty() && normalized_agent.contains(ua.as_str()))
                    {
                        crawl_delay_for_agent = Some(delay);
                    }
                }
                _ => {
                    group_has_rules = true;
                }
            }
        }

        crawl_delay_for_agent.or(crawl_delay_for_wildcard)
    }
}
