/// Canonical form used when comparing front-end paths with schema paths.
///
/// Only trailing `/` characters are removed; case, query strings and
/// `{param}` segments are compared as written.
pub fn normalize_path(raw: &str) -> &str {
    raw.trim_end_matches('/')
}

/// `true` when both paths are equal after normalization
pub fn same_path(a: &str, b: &str) -> bool {
    normalize_path(a) == normalize_path(b)
}

/// Join a base URL and a path with exactly one `/` between them
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
