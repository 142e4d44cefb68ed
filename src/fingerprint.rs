//! Deterministic article fingerprints.
//!
//! An article's index id is derived from its scope, canonicalized URL and
//! publication time, so re-ingesting the same feed overwrites the same
//! record instead of duplicating it. Fingerprints carry a human-legible
//! scope prefix and a short content-derived hash suffix.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use url::Url;

/// Hex characters of the hash kept in the id suffix.
const SUFFIX_LEN: usize = 16;

/// Derives a stable id for an article.
///
/// Pure and deterministic: the same (scope, url, published_at) always
/// yields the same id, within a process and across restarts. When `url`
/// is empty the title stands in as the hash basis so the call never fails.
pub fn fingerprint(scope: &str, url: &str, title: &str, published_at: DateTime<Utc>) -> String {
    let basis = if url.trim().is_empty() {
        format!("{}|{}", title.trim().to_lowercase(), published_at.to_rfc3339())
    } else {
        let canonical = canonicalize_url(url).unwrap_or_else(|_| url.trim().to_string());
        format!("{}|{}", canonical, published_at.to_rfc3339())
    };

    let digest = sha256_hex(&basis);
    format!("{}-{}", scope_slug(scope), &digest[..SUFFIX_LEN])
}

/// SHA-256 of `input` as lowercase hex.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Lowercases the scope and collapses runs of non-alphanumeric characters
/// to single dashes, so ids stay legible for arbitrary topic strings.
fn scope_slug(scope: &str) -> String {
    let mut slug = String::with_capacity(scope.len());
    let mut last_dash = true;
    for c in scope.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    let trimmed = slug.trim_end_matches('-');
    if trimmed.is_empty() {
        "article".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Reduces a URL to canonical form before hashing:
/// fragment removed, tracking parameters stripped, query parameters
/// sorted, scheme and host lowercased. Republished tracking links then
/// collapse to a single fingerprint.
pub fn canonicalize_url(url_str: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(url_str.trim())?;

    url.set_fragment(None);

    let tracking_params: HashSet<&str> = [
        "utm_source",
        "utm_medium",
        "utm_campaign",
        "utm_term",
        "utm_content",
        "fbclid",
        "gclid",
        "msclkid",
        "ref",
        "mc_cid",
        "mc_eid",
    ]
    .into_iter()
    .collect();

    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !tracking_params.contains(key.as_ref()))
        .map(|(k, v)| (k.to_lowercase(), v.to_string()))
        .collect();

    url.set_query(None);
    if !params.is_empty() {
        params.sort();
        let query: String = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&query));
    }

    Ok(url.to_string().to_lowercase())
}
