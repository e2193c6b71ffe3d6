//! Validators for conditional GET/HEAD requests.
//!
//! `If-None-Match` takes precedence; `If-Modified-Since` is only consulted
//! when the client sent no entity tags.

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Utc};

/// Format a Unix timestamp as an HTTP date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn http_date(secs: u64) -> Option<String> {
    let secs = i64::try_from(secs).ok()?;
    let time = DateTime::<Utc>::from_timestamp(secs, 0)?;
    Some(time.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
}

/// Check a client `If-None-Match` header against the server `ETag`
///
/// Supports a single tag, a comma separated list and the `*` wildcard.
/// Weak tags (`W/"..."`) compare equal to their strong form.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag.split(',').any(|e| {
            let e = e.trim();
            e == "*" || e.strip_prefix("W/").unwrap_or(e) == etag
        })
    })
}

/// Check a client `If-Modified-Since` header against the asset timestamp
pub fn check_not_modified_since(if_modified_since: Option<&str>, last_modified: u64) -> bool {
    let Some(since) = if_modified_since else {
        return false;
    };
    match DateTime::parse_from_rfc2822(since.trim()) {
        Ok(since) => i64::try_from(last_modified).is_ok_and(|lm| lm <= since.timestamp()),
        Err(_) => false,
    }
}

/// Whether the request headers allow answering `304 Not Modified`
pub fn is_not_modified(headers: &HeaderMap, etag: &str, last_modified: Option<u64>) -> bool {
    let if_none_match = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|h| h.to_str().ok());
    if if_none_match.is_some() {
        return check_etag_match(if_none_match, etag);
    }

    let if_modified_since = headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|h| h.to_str().ok());
    last_modified.is_some_and(|lm| check_not_modified_since(if_modified_since, lm))
}
