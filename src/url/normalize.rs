use crate::UrlError;
use url::Url;

/// Reduces a URL to its dedup key
///
/// # Canonicalization Steps
///
/// 1. Remove fragment (everything after #)
/// 2. Remove the query string
/// 3. Remove trailing slashes from the path (the root `/` is kept)
///
/// Scheme, host and port are kept as parsed; the `url` crate already lowercases
/// the host and resolves dot segments. Applying this twice gives the same URL.
///
/// # Examples
///
/// ```
/// use mailsift::url::canonicalize;
/// use url::Url;
///
/// let url = Url::parse("http://Site.test/a/?q=1#top").unwrap();
/// assert_eq!(canonicalize(&url).as_str(), "http://site.test/a");
/// ```
pub fn canonicalize(url: &Url) -> Url {
    let mut canonical = url.clone();
    canonical.set_fragment(None);
    canonical.set_query(None);

    let trimmed = canonical.path().trim_end_matches('/');
    if trimmed.len() != canonical.path().len() {
        let path = if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        };
        canonical.set_path(&path);
    }

    canonical
}

/// Parses and canonicalizes the crawl seed
///
/// Unlike discovered links, a bad seed is an error for the caller: the crawl
/// never starts from an unusable URL.
///
/// # Returns
///
/// * `Ok(Url)` - Canonical absolute http(s) URL
/// * `Err(UrlError)` - Unparseable, non-http(s), or host-less input
pub fn parse_seed(seed: &str) -> Result<Url, UrlError> {
    let url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(canonicalize(&url))
}
