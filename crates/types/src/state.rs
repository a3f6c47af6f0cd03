//! Add-repository decision states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of matching a candidate address and fingerprint against the known repos.
///
/// Exactly one state holds at a time; it is recomputed from scratch on every
/// input change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddRepoState {
    DoesntExist,
    ExistsFingerprintMismatch,
    ExistsAddMirror,
    ExistsDisabled,
    ExistsEnabled,
    ExistsUpgradableToSigned,
    InvalidUrl,
    IsSwap,
}

/// How a boundary layer should render a state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatePresentation {
    /// Message key shown above the input, if any
    pub message: Option<&'static str>,
    /// Render the message as a warning
    pub warning: bool,
    /// Label key of the confirm action
    pub action: &'static str,
    pub action_enabled: bool,
}

impl AddRepoState {
    /// States that refer to a repository that is already known
    #[must_use]
    pub fn is_existing(self) -> bool {
        matches!(
            self,
            Self::ExistsFingerprintMismatch
                | Self::ExistsAddMirror
                | Self::ExistsDisabled
                | Self::ExistsEnabled
                | Self::ExistsUpgradableToSigned
        )
    }

    /// States whose commit writes to an existing record
    #[must_use]
    pub fn updates_existing(self) -> bool {
        matches!(
            self,
            Self::ExistsDisabled | Self::ExistsUpgradableToSigned | Self::ExistsAddMirror
        )
    }

    /// Advisory message key, if the state shows one
    #[must_use]
    pub fn message_key(self) -> Option<&'static str> {
        self.presentation().message
    }

    #[must_use]
    pub fn presentation(self) -> StatePresentation {
        let (message, warning, action, action_enabled) = match self {
            Self::DoesntExist => (None, false, "repo_add_add", true),
            Self::ExistsFingerprintMismatch => {
                (Some("repo_delete_to_overwrite"), true, "overwrite", false)
            }
            Self::InvalidUrl => (Some("invalid_url"), true, "repo_add_add", false),
            Self::ExistsDisabled => (Some("repo_exists_enable"), false, "enable", true),
            Self::ExistsEnabled => (Some("repo_exists_and_enabled"), false, "ok", true),
            Self::ExistsAddMirror => (Some("repo_exists_add_mirror"), false, "repo_add_mirror", true),
            Self::ExistsUpgradableToSigned => {
                (Some("repo_exists_add_fingerprint"), false, "add_key", true)
            }
            Self::IsSwap => (None, false, "ok", false),
        };
        StatePresentation {
            message,
            warning,
            action,
            action_enabled,
        }
    }
}

impl fmt::Display for AddRepoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DoesntExist => "DOESNT_EXIST",
            Self::ExistsFingerprintMismatch => "EXISTS_FINGERPRINT_MISMATCH",
            Self::ExistsAddMirror => "EXISTS_ADD_MIRROR",
            Self::ExistsDisabled => "EXISTS_DISABLED",
            Self::ExistsEnabled => "EXISTS_ENABLED",
            Self::ExistsUpgradableToSigned => "EXISTS_UPGRADABLE_TO_SIGNED",
            Self::InvalidUrl => "INVALID_URL",
            Self::IsSwap => "IS_SWAP",
        };
        f.write_str(name)
    }
}
