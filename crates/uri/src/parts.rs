//! Lenient URI splitting
//!
//! User input arrives typed, pasted or scanned, so the splitter never rejects
//! anything. It only locates the components; callers decide what is acceptable.
//! A scheme is recognised when a `:` appears before any `/`, `?` or `#`.

use std::fmt;

/// Raw components of a URI string, as written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriParts {
    scheme: Option<String>,
    authority: Option<String>,
    /// `None` for opaque URIs such as `mailto:x`
    path: Option<String>,
    /// Scheme-specific part of an opaque URI
    opaque: Option<String>,
    query: Option<String>,
    fragment: Option<String>,
}

impl UriParts {
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let (rest, fragment) = match input.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (input, None),
        };

        let scheme_end = rest
            .char_indices()
            .find(|&(_, c)| matches!(c, ':' | '/' | '?'))
            .filter(|&(_, c)| c == ':')
            .map(|(i, _)| i);

        let (scheme, ssp) = match scheme_end {
            Some(i) => (Some(rest[..i].to_string()), &rest[i + 1..]),
            None => (None, rest),
        };

        if scheme.is_some() && !ssp.starts_with('/') {
            return Self {
                scheme,
                authority: None,
                path: None,
                opaque: Some(ssp.to_string()),
                query: None,
                fragment,
            };
        }

        let (before_query, query) = match ssp.split_once('?') {
            Some((before, query)) => (before, Some(query.to_string())),
            None => (ssp, None),
        };

        let (authority, path) = match before_query.strip_prefix("//") {
            Some(after) => {
                let end = after.find('/').unwrap_or(after.len());
                (Some(after[..end].to_string()), after[end..].to_string())
            }
            None => (None, before_query.to_string()),
        };

        Self {
            scheme,
            authority,
            path: Some(path),
            opaque: None,
            query,
            fragment,
        }
    }

    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    #[must_use]
    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Absolute URIs carry a scheme
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.scheme.is_some()
    }

    /// Relative references are always hierarchical; absolute ones only when
    /// the part after the scheme starts with `/`.
    #[must_use]
    pub fn is_hierarchical(&self) -> bool {
        self.path.is_some()
    }

    /// Everything before the last `@` of the authority
    #[must_use]
    pub fn user_info(&self) -> Option<&str> {
        let authority = self.authority.as_deref()?;
        authority.rfind('@').map(|i| &authority[..i])
    }

    /// Authority without user-info, i.e. `host[:port]`
    #[must_use]
    pub fn host_and_port(&self) -> Option<&str> {
        let authority = self.authority.as_deref()?;
        Some(match authority.rfind('@') {
            Some(i) => &authority[i + 1..],
            None => authority,
        })
    }

    #[must_use]
    pub fn host(&self) -> Option<&str> {
        let host_port = self.host_and_port()?;
        Some(match port_separator(host_port) {
            Some(i) => &host_port[..i],
            None => host_port,
        })
    }

    /// Explicit port; a non-numeric port counts as absent
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        let host_port = self.host_and_port()?;
        let i = port_separator(host_port)?;
        host_port[i + 1..].parse().ok()
    }

    /// First value of a query parameter, percent- and plus-decoded
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Non-empty path segments
    pub fn path_segments(&self) -> impl Iterator<Item = &str> {
        self.path
            .as_deref()
            .unwrap_or_default()
            .split('/')
            .filter(|s| !s.is_empty())
    }

    pub(crate) fn set_scheme(&mut self, scheme: Option<String>) {
        self.scheme = scheme;
    }

    pub(crate) fn set_authority(&mut self, authority: Option<String>) {
        self.authority = authority;
    }

    pub(crate) fn set_path(&mut self, path: String) {
        self.path = Some(path);
    }

    pub(crate) fn clear_query_and_fragment(&mut self) {
        self.query = None;
        self.fragment = None;
    }
}

/// Index of the `:` separating host and port, ignoring IPv6 literals
fn port_separator(host_port: &str) -> Option<usize> {
    let i = host_port.rfind(':')?;
    if host_port[i..].contains(']') {
        None
    } else {
        Some(i)
    }
}

impl fmt::Display for UriParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}:")?;
        }
        if let Some(authority) = &self.authority {
            write!(f, "//{authority}")?;
        }
        if let Some(path) = &self.path {
            f.write_str(path)?;
        }
        if let Some(opaque) = &self.opaque {
            f.write_str(opaque)?;
        }
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_uri() {
        let parts =
            UriParts::parse("https://user:pa:ss@Example.org:8080/fdroid/repo/?fingerprint=AB&x=1#top");
        assert_eq!(parts.scheme(), Some("https"));
        assert_eq!(parts.user_info(), Some("user:pa:ss"));
        assert_eq!(parts.host(), Some("Example.org"));
        assert_eq!(parts.port(), Some(8080));
        assert_eq!(parts.path(), Some("/fdroid/repo/"));
        assert_eq!(parts.query_param("fingerprint").as_deref(), Some("AB"));
        assert_eq!(parts.fragment(), Some("top"));
    }

    #[test]
    fn test_display_reassembles_input() {
        for input in [
            "https://user@host:1/a//b/?q=1#f",
            "content://authority/tree/313E-1F1C%3A",
            "mailto:someone@example.org",
            "bubu1.eu",
        ] {
            assert_eq!(UriParts::parse(input).to_string(), input);
        }
    }

    #[test]
    fn test_no_scheme_is_relative() {
        let parts = UriParts::parse("bubu1.eu");
        assert!(!parts.is_absolute());
        assert!(parts.is_hierarchical());
        assert_eq!(parts.host(), None);
        assert_eq!(parts.path(), Some("bubu1.eu"));
    }

    #[test]
    fn test_opaque_uri() {
        let parts = UriParts::parse("mailto:someone@example.org");
        assert!(parts.is_absolute());
        assert!(!parts.is_hierarchical());
        assert_eq!(parts.host(), None);
    }

    #[test]
    fn test_junk_before_scheme_becomes_scheme() {
        let parts = UriParts::parse("Thisisanalternative F-Droid clienthttps://bubu1.eu/cctg/fdroid/repo");
        assert_eq!(parts.scheme(), Some("Thisisanalternative F-Droid clienthttps"));
        assert_eq!(parts.host(), Some("bubu1.eu"));
    }

    #[test]
    fn test_empty_user_info_and_bad_port() {
        let parts = UriParts::parse("https://@bubu1.eu:abc/repo");
        assert_eq!(parts.user_info(), Some(""));
        assert_eq!(parts.host(), Some("bubu1.eu"));
        assert_eq!(parts.port(), None);
    }

    #[test]
    fn test_ipv6_host() {
        let parts = UriParts::parse("http://[::1]/fdroid/repo");
        assert_eq!(parts.host(), Some("[::1]"));
        assert_eq!(parts.port(), None);

        let parts = UriParts::parse("http://[::1]:8888/fdroid/repo");
        assert_eq!(parts.host(), Some("[::1]"));
        assert_eq!(parts.port(), Some(8888));
    }

    #[test]
    fn test_path_segments_skip_empty() {
        let parts = UriParts::parse("https://host//a///b/");
        assert_eq!(parts.path_segments().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
