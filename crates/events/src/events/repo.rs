use fdr_types::AddRepoState;
use serde::{Deserialize, Serialize};

/// Add-repository workflow events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RepoEvent {
    /// The classified state changed; only emitted when it differs from the previous one
    AddStateChanged {
        from: Option<AddRepoState>,
        to: AddRepoState,
        /// Name of the implicated known repo, if any
        repo_name: Option<String>,
    },

    /// Searching for the repository index started
    ProbeStarted { address: String },

    /// Candidate address currently being checked
    ProbeAttempt { address: String },

    /// Probe finished
    ProbeFinished {
        address: String,
        status: Option<u16>,
        outcome: String,
    },

    /// A new repository record was written
    RepoCreated { address: String },

    /// An existing repository was enabled or updated
    RepoEnabled { address: String },

    /// A user mirror was appended to an existing repository
    MirrorAdded { address: String, mirror: String },

    /// The repository was switched off
    RepoDisabled { address: String },

    /// An index refresh was requested from the update service
    RefreshRequested,

    /// The add-repo session reached a terminal step
    SessionFinished { imported: bool },
}
