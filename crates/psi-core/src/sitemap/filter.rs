//! Include/exclude/type filters applied to extracted sitemap URLs.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::url_model::{is_probably_non_html, normalize};

/// Path markers that identify blog-style content.
pub const POST_MARKERS: &[&str] = &["/blog/", "/post/", "/news/", "/article/"];

pub const DEFAULT_MAX_URLS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlType {
    #[default]
    All,
    /// Everything except blog-style content.
    Pages,
    /// Only blog-style content.
    Posts,
}

impl UrlType {
    fn keeps(self, url: &str) -> bool {
        let lower = url.to_ascii_lowercase();
        let is_post = POST_MARKERS.iter().any(|m| lower.contains(m));
        match self {
            UrlType::All => true,
            UrlType::Pages => !is_post,
            UrlType::Posts => is_post,
        }
    }
}

impl FromStr for UrlType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(UrlType::All),
            "pages" => Ok(UrlType::Pages),
            "posts" => Ok(UrlType::Posts),
            other => Err(format!("unknown url type {:?} (expected all, pages or posts)", other)),
        }
    }
}

impl fmt::Display for UrlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UrlType::All => "all",
            UrlType::Pages => "pages",
            UrlType::Posts => "posts",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlFilters {
    /// Comma-separated tokens; a URL is kept if any token matches.
    #[serde(default)]
    pub include_pattern: Option<String>,
    /// Comma-separated tokens; a URL is dropped if any token matches.
    #[serde(default)]
    pub exclude_pattern: Option<String>,
    pub max_urls: usize,
    #[serde(default)]
    pub url_type: UrlType,
}

impl Default for UrlFilters {
    fn default() -> Self {
        Self {
            include_pattern: None,
            exclude_pattern: None,
            max_urls: DEFAULT_MAX_URLS,
            url_type: UrlType::All,
        }
    }
}

enum Token {
    Regex(Regex),
    Substring(String),
}

/// Tokens from a comma-separated pattern. Each token is a regex if it
/// compiles, else a plain substring.
struct PatternSet(Vec<Token>);

impl PatternSet {
    fn parse(pattern: Option<&str>) -> Option<Self> {
        let tokens: Vec<Token> = pattern?
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| match Regex::new(t) {
                Ok(re) => Token::Regex(re),
                Err(_) => Token::Substring(t.to_string()),
            })
            .collect();
        (!tokens.is_empty()).then_some(PatternSet(tokens))
    }

    fn matches(&self, url: &str) -> bool {
        self.0.iter().any(|t| match t {
            Token::Regex(re) => re.is_match(url),
            Token::Substring(s) => url.contains(s.as_str()),
        })
    }
}

/// Applies, in order: normalize (failures dropped), include, exclude, url
/// type, non-HTML heuristic, dedupe (first wins), truncate to `max_urls`.
pub fn apply_filters(raw: &[String], filters: &UrlFilters) -> Vec<String> {
    let include = PatternSet::parse(filters.include_pattern.as_deref());
    let exclude = PatternSet::parse(filters.exclude_pattern.as_deref());
    let mut seen = HashSet::new();

    raw.iter()
        .map(|u| normalize(u))
        .filter(|n| n.is_ok())
        .map(|n| n.normalized)
        .filter(|u| include.as_ref().map_or(true, |p| p.matches(u)))
        .filter(|u| !exclude.as_ref().map_or(false, |p| p.matches(u)))
        .filter(|u| filters.url_type.keeps(u))
        .filter(|u| !is_probably_non_html(u))
        .filter(|u| seen.insert(u.clone()))
        .take(filters.max_urls)
        .collect()
}
