use std::path::Path;

/// Join an API path onto the base URI.
///
/// Absolute `http://` or `https://` paths are returned unchanged, so signed
/// storage URLs can go through the same code path as API routes.
///
/// # Examples
///
/// ```
/// use bodylabs_transport::join_url;
///
/// assert_eq!(join_url("https://api.test/", "/inputs/1"), "https://api.test/inputs/1");
/// assert_eq!(join_url("https://api.test", "https://bucket/x"), "https://bucket/x");
/// ```
pub fn join_url(base_uri: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base_uri.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

/// Returns `true` if the HTTP status code is a redirect (301, 302, 303, 307, 308).
pub fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// The final component of a path as UTF-8, if it has one.
pub fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}
