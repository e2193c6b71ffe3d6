//! Prefix routing for the embedded asset subsystem.
//!
//! Matching is segment aware and ASCII case-insensitive: `/performance`,
//! `/Performance/app.css` and `/performance/` are claimed, `/performancex`
//! and `/perf` are not.

use crate::constants::BASE_PATH;

/// Outcome of inspecting a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// The path belongs to the embedded asset server
    DelegateToAssetServer,
    /// Not handled here, forward to the next stage
    PassThrough,
}

/// Decide whether `path` falls under the embedded asset prefix
pub fn route(path: &str) -> RouteDecision {
    match strip_base(path) {
        Some(_) => RouteDecision::DelegateToAssetServer,
        None => RouteDecision::PassThrough,
    }
}

/// Return the part of `path` after the base segment, or `None` when the
/// path is not under it. The remainder is either empty or starts with `/`.
pub fn strip_base(path: &str) -> Option<&str> {
    // `get` refuses to split inside a multi-byte character
    let head = path.get(..BASE_PATH.len())?;
    if !head.eq_ignore_ascii_case(BASE_PATH) {
        return None;
    }

    let rest = &path[BASE_PATH.len()..];
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}
