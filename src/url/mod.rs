//! URL handling module for Mailsift
//!
//! This module turns raw `href` values into canonical same-site URLs, which are
//! the keys of the crawl frontier and visited set.

mod domain;
mod normalize;

pub use domain::{extract_domain, has_non_html_extension, is_same_site};
pub use normalize::{canonicalize, parse_seed};

use url::Url;

/// Normalizes a hyperlink found on a page into a crawlable URL
///
/// # Rules
///
/// **Reject:**
/// - empty targets and fragment-only targets (`#top`)
/// - targets that fail to resolve against `page_url`
/// - non-HTTP(S) results (`mailto:`, `javascript:`, `tel:`, `data:` ...)
/// - hosts other than `site_domain`
///
/// **Accept:** relative (`path`), root-relative (`/path`), protocol-relative
/// (`//host/path`) and absolute targets, returned in canonical form.
///
/// # Arguments
///
/// * `raw_href` - The attribute value as written in the page
/// * `page_url` - The URL of the page the link was found on
/// * `site_domain` - The host the crawl is confined to
///
/// # Examples
///
/// ```
/// use mailsift::url::normalize_link;
/// use url::Url;
///
/// let page = Url::parse("http://site.test/team/").unwrap();
/// let link = normalize_link("../contact/?ref=nav", &page, "site.test").unwrap();
/// assert_eq!(link.as_str(), "http://site.test/contact");
///
/// assert!(normalize_link("http://other.test/b", &page, "site.test").is_none());
/// ```
pub fn normalize_link(raw_href: &str, page_url: &Url, site_domain: &str) -> Option<Url> {
    let href = raw_href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let resolved = page_url.join(href).ok()?;

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    if !is_same_site(&resolved, site_domain) {
        return None;
    }

    Some(canonicalize(&resolved))
}
