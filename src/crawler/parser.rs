//! HTML parser for extracting links and identifiers
//!
//! This module handles parsing a fetched page once and extracting:
//! - Same-site links to follow (from `<a href>` tags), already canonicalized
//! - Email addresses from every extractor source

use crate::crawler::extractor::extract_emails;
use crate::url::normalize_link;
use scraper::{Html, Selector};
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;
use url::Url;

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Same-site canonical links, deduplicated, in document order
    pub links: Vec<Url>,

    /// Validated email addresses found anywhere on the page
    pub emails: BTreeSet<String>,
}

/// Parses HTML content and extracts links and addresses
///
/// # Link Extraction Rules
///
/// Every `<a href>` is passed through [`normalize_link`], so the result only
/// holds canonical http(s) URLs on `site_domain`. `rel="nofollow"` links are
/// followed. Fragment-only, `mailto:`, `javascript:`, `tel:` and `data:`
/// targets are dropped.
///
/// Parsing is lenient: malformed markup still yields whatever the HTML5
/// tree builder recovers.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The URL the content was fetched from (for relative links)
/// * `site_domain` - The host links must stay on
/// * `data_attribute` - Attribute carrying an address (e.g. `data-email`)
///
/// # Example
///
/// ```
/// use mailsift::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a> hello@example.com</body></html>"#;
/// let page_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &page_url, "example.com", "data-email");
/// assert_eq!(parsed.links[0].as_str(), "https://example.com/page");
/// assert!(parsed.emails.contains("hello@example.com"));
/// ```
pub fn parse_html(html: &str, page_url: &Url, site_domain: &str, data_attribute: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        links: extract_links(&document, page_url, site_domain),
        emails: extract_emails(&document, data_attribute),
    }
}

/// Extracts same-site links, keeping the first occurrence of each
fn extract_links(document: &Html, page_url: &Url, site_domain: &str) -> Vec<Url> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&LINK_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        match normalize_link(href, page_url, site_domain) {
            Some(url) => {
                if seen.insert(url.as_str().to_string()) {
                    links.push(url);
                }
            }
            None => tracing::trace!("Rejected link {:?} on {}", href, page_url),
        }
    }

    links
}
