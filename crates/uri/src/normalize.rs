//! URL normalization for comparing repository addresses

use fdr_errors::UriError;

use crate::parts::UriParts;

/// Scheme of storage-provider URIs, whose identifiers must not be rewritten
const CONTENT_SCHEME: &str = "content";

/// Canonicalize a repository URL for comparison.
///
/// Collapses runs of `/` in the path, strips one trailing `/`, lower-cases
/// scheme and host and resolves `.` and `..` segments. User-info, port,
/// query and fragment are kept. `content:` URIs come back unchanged, as does
/// any URL lacking a scheme or host.
///
/// # Errors
///
/// Returns `UriError::InvalidUri` when the URL is relative or opaque.
pub fn normalize(url: &str) -> Result<String, UriError> {
    let mut parts = UriParts::parse(url);
    if !parts.is_absolute() {
        return Err(UriError::invalid(
            url,
            "Must provide an absolute URI for repositories",
        ));
    }
    if !parts.is_hierarchical() {
        return Err(UriError::invalid(
            url,
            "Must provide an hierarchical URI for repositories",
        ));
    }
    if parts.scheme() == Some(CONTENT_SCHEME) {
        return Ok(url.to_string());
    }

    let scheme = parts.scheme().filter(|s| !s.is_empty()).map(str::to_ascii_lowercase);
    let host = parts.host().filter(|h| !h.is_empty()).map(str::to_lowercase);
    let (Some(scheme), Some(host)) = (scheme, host) else {
        return Ok(url.to_string());
    };

    let mut authority = String::new();
    if let Some(user_info) = parts.user_info() {
        authority.push_str(user_info);
        authority.push('@');
    }
    authority.push_str(&host);
    if let Some(port) = parts.port() {
        authority.push(':');
        authority.push_str(&port.to_string());
    }

    let path = collapse_slashes(parts.path().unwrap_or_default());
    let path = path.strip_suffix('/').unwrap_or(&path);
    let path = remove_dot_segments(path);

    parts.set_scheme(Some(scheme));
    parts.set_authority(Some(authority));
    parts.set_path(path);
    Ok(parts.to_string())
}

/// Drop the query and fragment, leaving the rest of the URL as written
#[must_use]
pub fn strip_query_and_fragment(url: &str) -> String {
    let mut parts = UriParts::parse(url);
    parts.clear_query_and_fragment();
    parts.to_string()
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Resolve `.` and `..` segments of an absolute path.
///
/// A `..` with nothing left to remove is kept. When the final segment is
/// resolved away the result ends in `/`, so `/a/b/..` becomes `/a/`.
#[must_use]
pub fn remove_dot_segments(path: &str) -> String {
    let Some(rest) = path.strip_prefix('/') else {
        return path.to_string();
    };

    let segments: Vec<&str> = rest.split('/').collect();
    let last = segments.len() - 1;
    let mut out: Vec<&str> = Vec::with_capacity(segments.len());

    for (i, segment) in segments.into_iter().enumerate() {
        match segment {
            "." => {}
            ".." if out.last().is_some_and(|s| *s != "..") => {
                out.pop();
            }
            _ => {
                out.push(segment);
                continue;
            }
        }
        if i == last {
            out.push("");
        }
    }

    format!("/{}", out.join("/"))
}
