#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Repository identity resolution for fdroid-repo
//!
//! Decides whether a candidate address and fingerprint refer to a known
//! repository, searches the host for the repository index when they do not,
//! and drives the add-repository workflow through to a persisted record.

pub mod matcher;
pub mod prober;
pub mod refresh;
pub mod session;
pub mod store;

pub use matcher::{classify, Classification, RepoLookup, Validation};
pub use prober::{ProbeOutcome, ProbeStatus, RepoProber};
pub use refresh::{ChannelRefresher, IndexRefresher};
pub use session::{set_repo_enabled, AddRepoSession, CommitOutcome, SessionInput, SessionOrigin};
pub use store::{MemoryRepoStore, RepoStore};
