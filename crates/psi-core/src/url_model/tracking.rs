//! Tracking query parameter removal.

use url::Url;

/// Query parameters dropped during normalization.
pub const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_content",
    "utm_term",
    "fbclid",
    "gclid",
];

/// Removes [`TRACKING_PARAMS`] from the query. The query is rewritten only
/// when something was removed, so untouched queries keep their encoding.
pub(super) fn strip_tracking_params(url: &mut Url) {
    if url.query() == Some("") {
        url.set_query(None);
        return;
    }
    if url.query().is_none() {
        return;
    }

    let total = url.query_pairs().count();
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !TRACKING_PARAMS.contains(&k.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.len() == total {
        return;
    }
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
}
