#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Repository URI handling for fdroid-repo
//!
//! Turns whatever the user typed, pasted or scanned into a [`RepoConfig`]
//! and provides the canonical forms used to compare repository addresses.

pub mod config;
pub mod normalize;
pub mod parts;
pub mod path;
pub mod sanitize;

pub use config::{ParseErrorCode, RepoConfig, DEFAULT_NEW_REPO_TEXT};
pub use normalize::{normalize, remove_dot_segments, strip_query_and_fragment};
pub use parts::UriParts;
pub use path::{append_path, repo_type};
pub use sanitize::sanitize_repo_uri;
