//! `<loc>` scanning.
//!
//! Sitemaps in the wild are often not well-formed XML, so entries are
//! pulled out by scanning rather than parsing the whole document.

/// True when the document is a `<sitemapindex>` rather than a `<urlset>`.
pub fn is_sitemap_index(xml: &str) -> bool {
    find_ci(xml, "<sitemapindex", 0).is_some()
}

/// Every `<loc>` value in document order, trimmed, CDATA-unwrapped and
/// entity-decoded. Empty values are skipped.
pub fn extract_locs(xml: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut pos = 0;
    while let Some(open) = find_ci(xml, "<loc", pos) {
        let after_name = open + "<loc".len();
        // `<location>` or `<loc-foo>` are not `<loc>`.
        match xml[after_name..].chars().next() {
            Some(c) if c == '>' || c == '/' || c.is_whitespace() => {}
            _ => {
                pos = after_name;
                continue;
            }
        }
        let Some(gt) = xml[after_name..].find('>') else {
            break;
        };
        let content_start = after_name + gt + 1;
        if xml[..content_start].ends_with("/>") {
            pos = content_start;
            continue;
        }
        let Some(close) = find_ci(xml, "</loc>", content_start) else {
            break;
        };
        let value = decode_entities(unwrap_cdata(xml[content_start..close].trim()));
        let value = value.trim();
        if !value.is_empty() {
            out.push(value.to_string());
        }
        pos = close + "</loc>".len();
    }
    out
}

fn unwrap_cdata(s: &str) -> &str {
    s.strip_prefix("<![CDATA[")
        .and_then(|rest| rest.strip_suffix("]]>"))
        .map(str::trim)
        .unwrap_or(s)
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// ASCII case-insensitive `find` starting at byte `from`.
fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if from > hay.len() || needle.len() > hay.len() - from {
        return None;
    }
    (from..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))
}
