//! Repository persistence error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum StorageError {
    #[error("repository not found: {id}")]
    RepoNotFound { id: String },

    #[error("a repository with address {address} already exists")]
    DuplicateAddress { address: String },

    #[error("failed to write repository record: {message}")]
    WriteFailed { message: String },

    #[error("corrupted repository record: {message}")]
    CorruptedData { message: String },
}

impl UserFacingError for StorageError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::DuplicateAddress { .. } => {
                Some("Enable the existing repository instead of adding it again.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::WriteFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::RepoNotFound { .. } => "storage.repo_not_found",
            Self::DuplicateAddress { .. } => "storage.duplicate_address",
            Self::WriteFailed { .. } => "storage.write_failed",
            Self::CorruptedData { .. } => "storage.corrupted_data",
        };
        Some(code)
    }
}
