use serde::{Deserialize, Serialize};

use crate::{EventLevel, EventMeta, EventSource};
use fdr_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self {
            code: error.user_code().map(Into::into),
            message: error.user_message().into_owned(),
            hint: error.user_hint().map(Into::into),
            retryable: error.is_retryable(),
        }
    }
}

pub mod general;
pub mod repo;

pub use general::*;
pub use repo::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, debug output)
    General(GeneralEvent),

    /// Add-repository workflow events
    Repo(RepoEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::General,
            Self::Repo(
                RepoEvent::ProbeStarted { .. }
                | RepoEvent::ProbeAttempt { .. }
                | RepoEvent::ProbeFinished { .. },
            ) => EventSource::Probe,
            Self::Repo(_) => EventSource::Repo,
        }
    }

    /// Determine the appropriate log level for this event
    #[must_use]
    pub fn log_level(&self) -> EventLevel {
        match self {
            Self::General(GeneralEvent::Warning { .. }) => EventLevel::Warn,
            Self::General(GeneralEvent::DebugLog { .. })
            | Self::Repo(RepoEvent::ProbeAttempt { .. } | RepoEvent::AddStateChanged { .. }) => {
                EventLevel::Debug
            }
            Self::Repo(_) => EventLevel::Info,
        }
    }

    /// Metadata for this event at emission time
    #[must_use]
    pub fn meta(&self) -> EventMeta {
        EventMeta::new(self.log_level(), self.event_source())
    }

    /// Forward the event to the tracing subscriber
    pub fn record(&self) {
        let meta = self.meta();
        let source = meta.source.as_str();
        match meta.level {
            EventLevel::Error => tracing::error!(source, event = ?self, "event"),
            EventLevel::Warn => tracing::warn!(source, event = ?self, "event"),
            EventLevel::Info => tracing::info!(source, event = ?self, "event"),
            EventLevel::Debug => tracing::debug!(source, event = ?self, "event"),
            EventLevel::Trace => tracing::trace!(source, event = ?self, "event"),
        }
    }
}
