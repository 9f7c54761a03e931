use serde::Deserialize;

/// Main configuration structure for Mailsift
///
/// Every section is optional in the TOML file; missing sections take their
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// How the robots.txt verdict is applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotsMode {
    /// Rules are evaluated and logged, but every URL stays crawlable
    #[default]
    Permissive,
    /// Disallowed URLs are skipped
    Strict,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of HTML pages to fetch
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Maximum link distance from the seed URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Pause between consecutive fetches (seconds)
    pub delay: f64,

    /// Page request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// robots.txt request timeout (seconds)
    #[serde(rename = "robots-timeout")]
    pub robots_timeout: u64,

    #[serde(rename = "robots-mode")]
    pub robots_mode: RobotsMode,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            max_depth: 3,
            delay: 1.0,
            request_timeout: 30,
            robots_timeout: 10,
            robots_mode: RobotsMode::Permissive,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler, also the robots.txt product token
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "mailsift".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/mailsift/mailsift".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (compatible; +ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (compatible; +{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Identifier extraction configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Data attribute whose value is taken as an address
    #[serde(rename = "data-attribute")]
    pub data_attribute: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            data_attribute: "data-email".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the append-only address file
    #[serde(rename = "emails-path")]
    pub emails_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            emails_path: "emails.txt".to_string(),
        }
    }
}
