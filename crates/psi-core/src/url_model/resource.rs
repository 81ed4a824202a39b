//! Cheap "does this look like a non-HTML resource" heuristic.

use url::Url;

const NON_HTML_EXTENSIONS: &[&str] = &[
    ".xml", ".json", ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".ico", ".bmp",
    ".zip", ".gz", ".tar", ".tgz", ".rar", ".7z", ".css", ".js", ".txt", ".csv", ".mp3", ".mp4",
    ".avi", ".mov", ".woff", ".woff2", ".ttf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx",
];

/// True when the URL path suggests the resource is not an HTML page: a known
/// file extension, an `/api/` path, a sitemap, or a feed.
pub fn is_probably_non_html(url: &str) -> bool {
    let path = match Url::parse(url) {
        Ok(u) => u.path().to_ascii_lowercase(),
        Err(_) => url.to_ascii_lowercase(),
    };

    if NON_HTML_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return true;
    }
    if path.contains("/api/") || path.contains("sitemap") {
        return true;
    }
    path.split('/')
        .any(|seg| seg.starts_with("feed") || seg.contains("rss"))
}
