//! Path helpers shared by the matcher and the prober

use crate::parts::UriParts;

/// Repo type of a URL: the file name of its last path segment.
///
/// The segment is percent-decoded first, so a storage-provider URI such as
/// `content://a/tree/x%3A/document/x%3Afdroid%2Frepo` has type `repo`.
/// Empty when the URL has no path segments.
#[must_use]
pub fn repo_type(url: &str) -> String {
    let parts = UriParts::parse(url);
    let Some(last) = parts.path_segments().last() else {
        return String::new();
    };
    let decoded = urlencoding::decode(last).map_or_else(|_| last.to_string(), |d| d.into_owned());
    match decoded.rfind('/') {
        Some(i) => decoded[i + 1..].to_string(),
        None => decoded,
    }
}

/// Append an already-encoded path suffix to a URL, keeping its query.
///
/// An empty suffix returns the URL unchanged.
#[must_use]
pub fn append_path(base: &str, suffix: &str) -> String {
    let suffix = suffix.trim_matches('/');
    if suffix.is_empty() {
        return base.to_string();
    }
    let mut parts = UriParts::parse(base);
    let path = parts.path().unwrap_or_default().trim_end_matches('/');
    let joined = format!("{path}/{suffix}");
    parts.set_path(joined);
    parts.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_type() {
        assert_eq!(repo_type("https://f-droid.org/repo"), "repo");
        assert_eq!(repo_type("https://f-droid.org/archive/"), "archive");
        assert_eq!(repo_type("https://f-droid.org/fdroid/repo?fingerprint=AB"), "repo");
        assert_eq!(repo_type("https://f-droid.org"), "");
        assert_eq!(repo_type("https://f-droid.org/"), "");
    }

    #[test]
    fn test_repo_type_of_content_uri() {
        assert_eq!(
            repo_type(
                "content://authority/tree/313E-1F1C%3A/document/313E-1F1C%3Aguardianproject.info%2Ffdroid%2Frepo"
            ),
            "repo"
        );
    }

    #[test]
    fn test_append_path() {
        assert_eq!(append_path("https://h/x", ""), "https://h/x");
        assert_eq!(append_path("https://h/x", "fdroid/repo"), "https://h/x/fdroid/repo");
        assert_eq!(append_path("https://h/x/", "repo"), "https://h/x/repo");
        assert_eq!(append_path("https://h", "repo"), "https://h/repo");
        assert_eq!(
            append_path("https://h/x?fingerprint=AB", "repo"),
            "https://h/x/repo?fingerprint=AB"
        );
    }
}
