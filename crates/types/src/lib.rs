#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for fdroid-repo
//!
//! This crate provides the repository record shared with the persistence
//! layer, the add-repository decision states, and fingerprint helpers.

pub mod fingerprint;
pub mod repo;
pub mod state;

// Re-export commonly used types
pub use fingerprint::{canonical_fingerprint, clean_fingerprint, fingerprints_match};
pub use repo::{parse_mirror_list, serialize_mirror_list, NewRepo, Repo, RepoId, RepoUpdate};
pub use state::{AddRepoState, StatePresentation};
pub use uuid::Uuid;
