use url::Url;

/// Path suffixes that never lead to an HTML page
const NON_HTML_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "csv", "rtf", "txt", "xml",
    "json", "zip", "rar", "7z", "gz", "tar", "tgz", "bz2", "exe", "dmg", "msi", "apk", "iso",
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "svg", "ico", "tif", "tiff", "mp3", "wav", "ogg",
    "flac", "mp4", "avi", "mov", "wmv", "mkv", "webm", "css", "js", "woff", "woff2", "ttf", "eot",
];

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use mailsift::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if `url` is served by `site_domain` (port ignored)
pub fn is_same_site(url: &Url, site_domain: &str) -> bool {
    url.host_str()
        .is_some_and(|host| host.eq_ignore_ascii_case(site_domain))
}

/// Returns true if the last path segment carries a known binary/document suffix
///
/// Used to skip a request whose response would be discarded anyway.
pub fn has_non_html_extension(url: &Url) -> bool {
    let last_segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    match last_segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            let ext = ext.to_ascii_lowercase();
            NON_HTML_EXTENSIONS.contains(&ext.as_str())
        }
        _ => false,
    }
}
