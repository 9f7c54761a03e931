//! Email address extraction from parsed HTML
//!
//! Addresses come from four independent sources which are always unioned:
//! visible text, `mailto:` link targets, a designated data attribute, and
//! `<meta content>` values. Every candidate must pass [`is_valid_email`].

use percent_encoding::percent_decode_str;
use regex::Regex;
use scraper::{Html, Node, Selector};
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

/// Loose pattern used to find address-like tokens in free text
static EMAIL_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});

/// Strict pattern every stored address must match in full
static VALID_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.+-]+@[A-Za-z0-9-]+\.[A-Za-z0-9.-]+$").unwrap()
});

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").unwrap());

static META_CONTENT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta[content]").unwrap());

/// Elements whose text content is never rendered
const HIDDEN_TEXT_PARENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Checks an address against the strict format
///
/// # Examples
///
/// ```
/// use mailsift::crawler::is_valid_email;
///
/// assert!(is_valid_email("first.last+tag@mail.example.org"));
/// assert!(!is_valid_email("broken@@x"));
/// assert!(!is_valid_email("100%@example.com"));
/// ```
pub fn is_valid_email(candidate: &str) -> bool {
    VALID_EMAIL.is_match(candidate)
}

/// Extracts all valid addresses from a document
///
/// # Arguments
///
/// * `document` - The parsed page
/// * `data_attribute` - Attribute name whose value is an address (e.g. `data-email`)
///
/// # Returns
///
/// The validated addresses, deduplicated by exact string. Case-insensitive
/// dedup across pages happens in [`IdentifierSet`].
pub fn extract_emails(document: &Html, data_attribute: &str) -> BTreeSet<String> {
    let mut candidates = Vec::new();

    extract_from_text(document, &mut candidates);
    extract_from_mailto(document, &mut candidates);
    extract_from_data_attribute(document, data_attribute, &mut candidates);
    extract_from_meta(document, &mut candidates);

    candidates
        .into_iter()
        .filter(|candidate| {
            let valid = is_valid_email(candidate);
            if !valid {
                tracing::trace!("Discarding malformed address candidate: {}", candidate);
            }
            valid
        })
        .collect()
}

/// Source 1: text nodes a browser would render
fn extract_from_text(document: &Html, out: &mut Vec<String>) {
    for node in document.tree.nodes() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|e| e.name()))
            .is_some_and(|name| HIDDEN_TEXT_PARENTS.contains(&name));
        if hidden {
            continue;
        }

        let text: &str = text;
        out.extend(EMAIL_TOKEN.find_iter(text).map(|m| m.as_str().to_string()));
    }
}

/// Source 2: `mailto:` link targets, up to the first `?`, `&` or whitespace
fn extract_from_mailto(document: &Html, out: &mut Vec<String>) {
    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();

        let Some(scheme) = href.get(..7) else {
            continue;
        };
        if !scheme.eq_ignore_ascii_case("mailto:") {
            continue;
        }

        let target = &href[7..];
        let end = target
            .find(|c: char| c == '?' || c == '&' || c.is_whitespace())
            .unwrap_or(target.len());
        let address = percent_decode_str(&target[..end])
            .decode_utf8_lossy()
            .into_owned();

        if !address.is_empty() {
            out.push(address);
        }
    }
}

/// Source 3: values of the designated data attribute containing `@`
fn extract_from_data_attribute(document: &Html, attribute: &str, out: &mut Vec<String>) {
    let Ok(selector) = Selector::parse(&format!("[{}]", attribute)) else {
        tracing::warn!("Unusable data attribute name: {}", attribute);
        return;
    };

    for element in document.select(&selector) {
        if let Some(value) = element.value().attr(attribute) {
            let value = value.trim();
            if value.contains('@') {
                out.push(value.to_string());
            }
        }
    }
}

/// Source 4: address-like tokens in `<meta content>` values
fn extract_from_meta(document: &Html, out: &mut Vec<String>) {
    for element in document.select(&META_CONTENT_SELECTOR) {
        if let Some(content) = element.value().attr("content") {
            if content.contains('@') {
                out.extend(EMAIL_TOKEN.find_iter(content).map(|m| m.as_str().to_string()));
            }
        }
    }
}

/// Run-wide set of addresses, deduplicated case-insensitively
///
/// The first casing seen is the one kept and reported.
#[derive(Debug, Default, Clone)]
pub struct IdentifierSet {
    seen: HashSet<String>,
    emails: Vec<String>,
}

impl IdentifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an address; returns true if it was not present before
    pub fn insert(&mut self, email: &str) -> bool {
        if self.seen.insert(email.to_lowercase()) {
            self.emails.push(email.to_string());
            true
        } else {
            false
        }
    }

    /// Case-insensitive membership test
    pub fn contains(&self, email: &str) -> bool {
        self.seen.contains(&email.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    /// Addresses in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.emails.iter().map(String::as_str)
    }

    /// Consumes the set, returning addresses in first-seen order
    pub fn into_vec(self) -> Vec<String> {
        self.emails
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> BTreeSet<String> {
        extract_emails(&Html::parse_document(html), "data-email")
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_text_and_mailto_scenario() {
        let html = r#"<html><body>
            <p>contact: a@b.com and broken@@x</p>
            <a href="mailto:c@d.org?subject=hi">Write to us</a>
        </body></html>"#;
        assert_eq!(extract(html), set(&["a@b.com", "c@d.org"]));
    }

    #[test]
    fn test_text_in_any_element() {
        let html = r#"<html><body>
            <table><tr><td>sales@shop.example.com</td></tr></table>
            <footer><span>Reach us at <b>Help@Shop.Example.com</b>.</span></footer>
        </body></html>"#;
        assert_eq!(
            extract(html),
            set(&["sales@shop.example.com", "Help@Shop.Example.com"])
        );
    }

    #[test]
    fn test_script_and_style_text_ignored() {
        let html = r#"<html><head>
            <style>.x::after { content: "css@style.com"; }</style>
            <script>var a = "js@script.com";</script>
        </head><body><p>real@visible.com</p></body></html>"#;
        assert_eq!(extract(html), set(&["real@visible.com"]));
    }

    #[test]
    fn test_mailto_variants() {
        let html = r#"<html><body>
            <a href="MAILTO:upper@example.com">x</a>
            <a href="mailto:multi@example.com&cc=other@example.com">x</a>
            <a href="mailto:first.last%40corp.example.com">x</a>
            <a href="mailto:">empty</a>
            <a href="mailto:not-an-address">bad</a>
            <a href="/contact">not mailto</a>
        </body></html>"#;
        assert_eq!(
            extract(html),
            set(&[
                "upper@example.com",
                "multi@example.com",
                "first.last@corp.example.com"
            ])
        );
    }

    #[test]
    fn test_data_attribute() {
        let html = r#"<html><body>
            <span data-email=" info@example.net "></span>
            <span data-email="no-at-sign"></span>
            <div data-email="bad@@example.net"></div>
        </body></html>"#;
        assert_eq!(extract(html), set(&["info@example.net"]));
    }

    #[test]
    fn test_custom_data_attribute() {
        let html = r#"<div data-contact="team@example.io" data-email="ignored@example.io"></div>"#;
        let found = extract_emails(&Html::parse_document(html), "data-contact");
        assert_eq!(found, set(&["team@example.io"]));
    }

    #[test]
    fn test_meta_content() {
        let html = r#"<html><head>
            <meta name="author" content="Jane Doe <jane@example.com>">
            <meta name="description" content="No address here">
        </head><body></body></html>"#;
        assert_eq!(extract(html), set(&["jane@example.com"]));
    }

    #[test]
    fn test_loose_match_failing_strict_validation_is_dropped() {
        // Matches the text pattern ('%' is allowed there) but not the strict one
        let html = "<p>odd%name@example.com and ok@example.com</p>";
        assert_eq!(extract(html), set(&["ok@example.com"]));
    }

    #[test]
    fn test_no_addresses() {
        assert!(extract("<html><body><p>Nothing to see</p></body></html>").is_empty());
        assert!(extract("").is_empty());
        assert!(extract("<<<not really html").is_empty());
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first_last-1+x@sub.example.co.uk"));

        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("broken@@x"));
    }

    #[test]
    fn test_mailto_percent_escapes() {
        assert_eq!(
            extract(r#"<a href="mailto:sales%40shop.test">Sales</a>"#),
            set(&["sales@shop.test"])
        );
        assert_eq!(
            extract(r#"<a href="mailto:info%2Bdesk@shop.test?subject=Hi">Desk</a>"#),
            set(&["info+desk@shop.test"])
        );
        // A malformed escape stays literal and fails validation
        assert!(extract(r#"<a href="mailto:bad%zz@shop.test">Bad</a>"#).is_empty());
    }

    #[test]
    fn test_identifier_set_case_insensitive() {
        let mut ids = IdentifierSet::new();
        assert!(ids.insert("Info@Example.com"));
        assert!(!ids.insert("info@example.com"));
        assert!(ids.insert("sales@example.com"));

        assert_eq!(ids.len(), 2);
        assert!(ids.contains("INFO@EXAMPLE.COM"));
        assert_eq!(
            ids.iter().collect::<Vec<_>>(),
            vec!["Info@Example.com", "sales@example.com"]
        );
    }
}
