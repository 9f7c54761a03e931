/// Per-URL outcome definitions for the crawl loop
///
/// Every dequeued frontier entry ends in exactly one of these outcomes; the
/// coordinator's loop matches on them instead of catching errors.
use std::fmt;

/// Why an entry was dropped without producing a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The URL was already processed in this run
    AlreadyVisited,

    /// The entry lies deeper than the configured maximum depth
    DepthExceeded,

    /// The path ends in a known binary/document suffix
    NonHtmlExtension,

    /// robots.txt disallows the URL and the gate is strict
    RobotsDisallowed,

    /// The server answered with a non-HTML Content-Type
    NonHtmlContent,

    /// A redirect led to a host outside the crawled site
    OffSiteRedirect,
}

/// Why a fetch attempt produced no page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The server answered with a non-success status
    HttpStatus(u16),

    /// Connection, TLS, timeout or body read error
    Network(String),
}

/// The result of processing one frontier entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// An HTML page was fetched and processed
    Fetched {
        /// Links newly added to the frontier
        new_links: usize,
        /// Addresses seen for the first time in this run
        new_emails: usize,
    },

    /// The entry was dropped before or instead of producing a page
    Skipped(SkipReason),

    /// The fetch failed; the crawl continues
    Failed(FailureReason),
}

impl PageOutcome {
    /// Returns true if this outcome added a page to the discovered list
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Fetched { .. })
    }

    /// Returns true if the URL must be recorded as visited
    ///
    /// Everything except a duplicate dequeue marks its URL visited.
    pub fn marks_visited(&self) -> bool {
        !matches!(self, Self::Skipped(SkipReason::AlreadyVisited))
    }

    /// Returns true if a request went out to the server
    pub fn contacted_server(&self) -> bool {
        matches!(
            self,
            Self::Fetched { .. }
                | Self::Failed(_)
                | Self::Skipped(SkipReason::NonHtmlContent | SkipReason::OffSiteRedirect)
        )
    }
}

impl SkipReason {
    /// Short snake_case label for logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlreadyVisited => "already_visited",
            Self::DepthExceeded => "depth_exceeded",
            Self::NonHtmlExtension => "non_html_extension",
            Self::RobotsDisallowed => "robots_disallowed",
            Self::NonHtmlContent => "non_html_content",
            Self::OffSiteRedirect => "off_site_redirect",
        }
    }

    /// Returns all skip reasons, in reporting order
    pub fn all() -> [Self; 6] {
        [
            Self::AlreadyVisited,
            Self::DepthExceeded,
            Self::NonHtmlExtension,
            Self::RobotsDisallowed,
            Self::NonHtmlContent,
            Self::OffSiteRedirect,
        ]
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus(code) => write!(f, "HTTP {}", code),
            Self::Network(error) => write!(f, "network error: {}", error),
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetched {
                new_links,
                new_emails,
            } => write!(f, "fetched ({} new links, {} new emails)", new_links, new_emails),
            Self::Skipped(reason) => write!(f, "skipped ({})", reason),
            Self::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}
