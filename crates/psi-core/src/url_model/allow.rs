//! Hosts that are never sent to the analysis API.

use url::{Host, Url};

/// Placeholder and local domains refused for analysis (subdomains included).
const BLOCKED_DOMAINS: &[&str] = &[
    "localhost",
    "example.com",
    "example.org",
    "example.net",
    "test.com",
];

/// Checks that a normalized URL may be analyzed: the remote API cannot reach
/// loopback addresses, and placeholder domains only burn quota.
///
/// Returns a human-readable reason on refusal.
pub fn is_allowed_for_analysis(url: &str) -> Result<(), String> {
    let parsed = Url::parse(url).map_err(|e| format!("Cannot parse \"{}\": {}", url, e))?;
    match parsed.host() {
        None => Err(format!("\"{}\" has no host", url)),
        Some(Host::Ipv4(ip)) if ip.is_loopback() || ip.is_unspecified() => Err(format!(
            "\"{}\" points at a local address and cannot be analyzed",
            url
        )),
        Some(Host::Ipv6(ip)) if ip.is_loopback() || ip.is_unspecified() => Err(format!(
            "\"{}\" points at a local address and cannot be analyzed",
            url
        )),
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.');
            let blocked = BLOCKED_DOMAINS
                .iter()
                .any(|b| domain == *b || domain.ends_with(&format!(".{}", b)));
            if blocked {
                Err(format!(
                    "\"{}\" is a placeholder or local domain and cannot be analyzed",
                    url
                ))
            } else {
                Ok(())
            }
        }
        Some(_) => Ok(()),
    }
}
