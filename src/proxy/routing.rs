//! Upstream URL construction.
//!
//! The only rewrite is textual: a leading `/api` is removed once. The
//! remainder is appended to the upstream base verbatim. The inbound query
//! string is not carried over.

pub const API_PREFIX: &str = "/api";

#[must_use]
pub fn strip_api_prefix(path: &str) -> &str {
    path.strip_prefix(API_PREFIX).unwrap_or(path)
}

#[must_use]
pub fn target_url(base: &str, path: &str) -> String {
    format!("{base}{}", strip_api_prefix(path))
}
