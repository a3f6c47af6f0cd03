//! URI parsing and normalization error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum UriError {
    #[error("invalid URI {uri}: {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("URI has no scheme: {uri}")]
    MissingScheme { uri: String },

    #[error("URI has no host: {uri}")]
    MissingHost { uri: String },

    #[error("unsupported scheme {scheme}")]
    UnsupportedScheme { scheme: String },
}

impl UriError {
    /// Shorthand for the common "not a usable repository address" case
    pub fn invalid(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUri {
            uri: uri.into(),
            reason: reason.into(),
        }
    }
}

impl UserFacingError for UriError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Borrowed("invalid repository URL")
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingScheme { .. } => Some("Start the address with https:// or http://."),
            Self::UnsupportedScheme { .. } => {
                Some("Only https, http, fdroidrepos and fdroidrepo addresses are accepted.")
            }
            _ => Some("Check the repository address and try again."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InvalidUri { .. } => "uri.invalid",
            Self::MissingScheme { .. } => "uri.missing_scheme",
            Self::MissingHost { .. } => "uri.missing_host",
            Self::UnsupportedScheme { .. } => "uri.unsupported_scheme",
        };
        Some(code)
    }
}
