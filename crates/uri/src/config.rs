//! Structured repository configuration extracted from an incoming URI

use fdr_errors::UriError;
use serde::{Deserialize, Serialize};

use crate::parts::UriParts;
use crate::sanitize::sanitize_parts;

/// Address pre-filled when no usable repository URI is available
pub const DEFAULT_NEW_REPO_TEXT: &str = "https://";

const ACCEPTED_SCHEMES: &[&str] = &["https", "http", "fdroidrepos", "fdroidrepo"];

/// Upper-case schemes emitted by QR encoders
const LEGACY_UPPERCASE_SCHEMES: &[&str] = &["FDROIDREPO", "FDROIDREPOS"];
const LEGACY_UPPERCASE_PATH: &str = "/FDROID/REPO";

/// Message key reported for a rejected URI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorCode {
    RepoUrlInvalid,
}

impl ParseErrorCode {
    #[must_use]
    pub fn message_key(self) -> &'static str {
        match self {
            Self::RepoUrlInvalid => "repo_url_invalid",
        }
    }
}

/// Repository details parsed from a URI that was clicked, scanned or pasted.
///
/// Only `is_valid` and `error` are meaningful on an invalid config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    valid: bool,
    error: Option<ParseErrorCode>,
    uri_string: String,
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    fingerprint: Option<String>,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            valid: false,
            error: None,
            uri_string: DEFAULT_NEW_REPO_TEXT.to_string(),
            host: None,
            port: None,
            username: None,
            password: None,
            fingerprint: None,
        }
    }
}

impl RepoConfig {
    /// Parse an optional incoming URI.
    ///
    /// `None` means no repo was provided and yields an invalid config without
    /// an error code.
    #[must_use]
    pub fn parse(uri: Option<&str>) -> Self {
        match uri {
            None => Self::default(),
            Some(uri) => Self::from_uri(uri),
        }
    }

    /// Parse a URI, recording a rejection as the `repo_url_invalid` error code
    #[must_use]
    pub fn from_uri(uri: &str) -> Self {
        Self::try_from_uri(uri).unwrap_or_else(|_| Self {
            error: Some(ParseErrorCode::RepoUrlInvalid),
            ..Self::default()
        })
    }

    /// Parse a URI into a valid config.
    ///
    /// # Errors
    ///
    /// Returns a `UriError` when the scheme or host is missing, the scheme is
    /// not a repository scheme, or the URI has no path.
    pub fn try_from_uri(uri: &str) -> Result<Self, UriError> {
        tracing::debug!(uri, "parsing incoming repo URI");

        let mut parts = UriParts::parse(uri);
        let scheme = parts
            .scheme()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| UriError::MissingScheme {
                uri: uri.to_string(),
            })?
            .to_string();
        let host = parts
            .host()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| UriError::MissingHost {
                uri: uri.to_string(),
            })?
            .to_lowercase();
        let port = parts.port();

        let legacy_uppercase = LEGACY_UPPERCASE_SCHEMES.contains(&scheme.as_str())
            || parts
                .path()
                .is_some_and(|p| p.ends_with(LEGACY_UPPERCASE_PATH));
        if legacy_uppercase {
            parts = UriParts::parse(&uri.to_lowercase());
        }

        let scheme = scheme.to_ascii_lowercase();
        if !ACCEPTED_SCHEMES.contains(&scheme.as_str()) {
            tracing::debug!(%scheme, "rejecting repo URI with unsupported scheme");
            return Err(UriError::UnsupportedScheme { scheme });
        }
        if parts.path().is_none() {
            return Err(UriError::invalid(uri, "repository URI has no path"));
        }

        let (username, password) = parts.user_info().and_then(split_credentials).unzip();
        let fingerprint = parts.query_param("fingerprint");
        let uri_string = sanitize_parts(parts);

        tracing::debug!(address = %uri_string, %host, "accepted repo URI");
        Ok(Self {
            valid: true,
            error: None,
            uri_string,
            host: Some(host),
            port,
            username,
            password,
            fingerprint,
        })
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[must_use]
    pub fn error(&self) -> Option<ParseErrorCode> {
        self.error
    }

    /// Canonical repository address
    #[must_use]
    pub fn repo_uri_string(&self) -> &str {
        &self.uri_string
    }

    /// Host, lower-cased for display
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Explicit port, else the default port of the canonical scheme.
    ///
    /// `None` only when neither is known.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port.or_else(|| {
            if self.uri_string.starts_with("https://") {
                Some(443)
            } else if self.uri_string.starts_with("http://") {
                Some(80)
            } else {
                None
            }
        })
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Fingerprint exactly as supplied in the `fingerprint` query parameter
    #[must_use]
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }
}

/// Split `user:password`; the password keeps any further colons.
///
/// Credentials are only reported when both halves are non-empty.
fn split_credentials(user_info: &str) -> Option<(String, String)> {
    let (username, password) = user_info.split_once(':')?;
    let password = password.trim_end_matches(':');
    if username.is_empty() || password.is_empty() {
        None
    } else {
        Some((username.to_string(), password.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_credentials() {
        assert_eq!(
            split_credentials("user:pa:ss"),
            Some(("user".to_string(), "pa:ss".to_string()))
        );
        assert_eq!(split_credentials("user"), None);
        assert_eq!(split_credentials("user:"), None);
        assert_eq!(split_credentials(":secret"), None);
        assert_eq!(split_credentials(""), None);
    }

    #[test]
    fn test_none_is_invalid_without_error() {
        let config = RepoConfig::parse(None);
        assert!(!config.is_valid());
        assert_eq!(config.error(), None);
        assert_eq!(config.repo_uri_string(), DEFAULT_NEW_REPO_TEXT);
    }

    #[test]
    fn test_try_from_uri_reports_kind() {
        assert!(matches!(
            RepoConfig::try_from_uri("bubu1.eu"),
            Err(UriError::MissingScheme { .. })
        ));
        assert!(matches!(
            RepoConfig::try_from_uri("https://"),
            Err(UriError::MissingHost { .. })
        ));
        assert!(matches!(
            RepoConfig::try_from_uri("ftp://bubu1.eu/repo"),
            Err(UriError::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn test_error_message_key() {
        let config = RepoConfig::from_uri("bubu1.eu");
        assert_eq!(
            config.error().map(ParseErrorCode::message_key),
            Some("repo_url_invalid")
        );
    }
}
