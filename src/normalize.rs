//! Article normalization.
//!
//! Maps raw upstream items into index-ready `Article` records. Partial
//! data never blocks an otherwise usable article: only items missing both
//! title and url are rejected.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::article::{Article, RawArticle, MAX_EMBED_CHARS};
use crate::error::NormalizeError;
use crate::fingerprint::fingerprint;

pub fn normalize(raw: &RawArticle, scope: &str) -> Result<Article, NormalizeError> {
    let title = raw.title.as_deref().unwrap_or("").trim();
    let url = raw.url.as_deref().unwrap_or("").trim();

    if title.is_empty() && url.is_empty() {
        return Err(NormalizeError(
            "article has neither title nor url".to_string(),
        ));
    }

    let description = raw
        .description
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_string();

    // Unparseable timestamps fall back to epoch rather than failing the item
    let published_at = raw
        .published_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

    let id = fingerprint(scope, url, title, published_at);
    debug!(id = %id, scope = scope, "Normalized article");

    Ok(Article {
        id,
        scope: scope.to_string(),
        title: title.to_string(),
        description: description.clone(),
        url: url.to_string(),
        source_name: raw.source.name.clone().unwrap_or_default(),
        author: raw.author.clone().filter(|a| !a.trim().is_empty()),
        image_url: raw.url_to_image.clone().filter(|u| !u.trim().is_empty()),
        published_at,
        content_for_embedding: embedding_text(title, &description),
    })
}

/// Title and description joined with a space, truncated on a char
/// boundary to [`MAX_EMBED_CHARS`].
fn embedding_text(title: &str, description: &str) -> String {
    let mut text = title.to_string();
    if !description.is_empty() {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(description);
    }

    if let Some((boundary, _)) = text.char_indices().nth(MAX_EMBED_CHARS) {
        text.truncate(boundary);
    }
    text
}
