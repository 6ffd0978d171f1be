//! Deterministic screenshot file names

use url::Url;

/// File name for a screenshot of `url`
///
/// `<host>_<path>.png`, where dots in the host become underscores and
/// slashes in the path become underscores. A missing host is `unknown`, an
/// empty path is `_`. Characters that are unsafe in file names are
/// replaced with `_`.
///
/// # Examples
///
/// ```
/// use inkprint_capture::filename_for_url;
///
/// assert_eq!(filename_for_url("https://www.reddit.com/r/foo/"), "www_reddit_com_r_foo.png");
/// assert_eq!(filename_for_url("https://example.org"), "example_org__.png");
/// ```
pub fn filename_for_url(url: &str) -> String {
    let (host, path) = match Url::parse(url.trim()) {
        Ok(parsed) => (
            parsed.host_str().map(|h| h.replace('.', "_")),
            parsed.path().to_string(),
        ),
        // No scheme: everything before the query is path, like a relative URL
        Err(_) => (None, strip_query(url.trim()).to_string()),
    };

    let host = host.unwrap_or_else(|| "unknown".to_string());
    let path = path.trim_matches('/').replace('/', "_");
    let path = if path.is_empty() { "_".to_string() } else { path };

    format!("{}_{}.png", sanitize(&host), sanitize(&path))
}

fn strip_query(raw: &str) -> &str {
    raw.split(['?', '#']).next().unwrap_or(raw)
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '%' | '~' | '+') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
