//! Canonical repository address production

use crate::parts::UriParts;

/// Legacy repository schemes and the transport they stand for.
///
/// Applied to the whole scheme token only, so `fdroidrepos` maps to `https`
/// rather than being mangled by a partial match on `fdroidrepo`.
const SCHEME_REWRITES: &[(&str, &str)] = &[("fdroidrepos", "https"), ("fdroidrepo", "http")];

/// Path segment written in upper case by QR encoders
const LEGACY_REPO_PATH: &str = "/FDROID/REPO";
const REPO_PATH: &str = "/fdroid/repo";

/// Canonical address of a repository URI.
///
/// Drops fragment, query, trailing slashes and user-info, lower-cases
/// scheme and host, maps the legacy `fdroidrepo[s]` schemes onto
/// `http[s]` and rewrites `/FDROID/REPO` to `/fdroid/repo`. Path case is
/// otherwise preserved. The result is stable under repeated sanitizing.
#[must_use]
pub fn sanitize_repo_uri(uri: &str) -> String {
    sanitize_parts(UriParts::parse(uri))
}

pub(crate) fn sanitize_parts(mut parts: UriParts) -> String {
    parts.clear_query_and_fragment();

    let scheme = parts.scheme().map(rewrite_scheme);
    parts.set_scheme(scheme);

    let authority = parts.host_and_port().map(lowercase_host);
    parts.set_authority(authority);

    if let Some(path) = parts.path() {
        let path = path.replace(LEGACY_REPO_PATH, REPO_PATH);
        parts.set_path(path.trim_end_matches('/').to_string());
    }

    parts.to_string()
}

fn rewrite_scheme(scheme: &str) -> String {
    let lower = scheme.to_ascii_lowercase();
    SCHEME_REWRITES
        .iter()
        .find(|(legacy, _)| *legacy == lower)
        .map_or(lower, |(_, transport)| (*transport).to_string())
}

/// Lower-case the host of a `host[:port]` string, leaving the port as written
fn lowercase_host(host_port: &str) -> String {
    match host_port.rfind(':').filter(|&i| !host_port[i..].contains(']')) {
        Some(i) => format!("{}{}", host_port[..i].to_lowercase(), &host_port[i..]),
        None => host_port.to_lowercase(),
    }
}
