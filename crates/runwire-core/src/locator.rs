//! Remote-or-local classification of `@`-prefixed file arguments.

use url::Url;

/// True when `value` is an absolute http(s) URL with a host.
///
/// Anything else is treated as a local path by callers, including strings
/// that technically parse as URLs with other schemes (`C:\data` would parse
/// with scheme `c`).
pub fn is_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}
