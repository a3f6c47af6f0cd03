//! Matching a candidate repository against the known ones

use std::collections::HashMap;

use fdr_types::{fingerprints_match, AddRepoState, Repo};
use fdr_uri::{normalize, repo_type};

/// When the candidate is being validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// While the user is still typing; malformed URLs are not reported
    Live,
    /// On an explicit commit; malformed URLs classify as `InvalidUrl`
    Commit,
}

/// Result of classifying a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub state: AddRepoState,
    /// Normalized candidate address, or the input when it could not be normalized
    pub address: String,
    /// The known repository implicated by the state
    pub repo: Option<Repo>,
}

/// Snapshot of the known repositories keyed by URL and by fingerprint.
///
/// Built once per add-repo session and never updated afterwards.
#[derive(Debug, Clone, Default)]
pub struct RepoLookup {
    by_url: HashMap<String, Repo>,
    by_fingerprint: HashMap<String, Repo>,
}

impl RepoLookup {
    /// Index `repos` for a session started with `candidate_address`.
    ///
    /// Every primary address and mirror maps to its repo. Only signed repos
    /// of the same repo type as the candidate are indexed by fingerprint, so
    /// a repo and its archive sharing a key do not collide.
    #[must_use]
    pub fn build(repos: &[Repo], candidate_address: &str) -> Self {
        let candidate_type = repo_type(candidate_address);
        let mut lookup = Self::default();

        for repo in repos {
            lookup.by_url.insert(repo.address.clone(), repo.clone());
            for mirror in repo.mirror_list() {
                lookup.by_url.insert(mirror.to_string(), repo.clone());
            }
            if let Some(fingerprint) = repo.signing_fingerprint() {
                if repo_type(&repo.address) == candidate_type {
                    lookup
                        .by_fingerprint
                        .insert(fingerprint.to_ascii_uppercase(), repo.clone());
                }
            }
        }

        tracing::debug!(
            urls = lookup.by_url.len(),
            fingerprints = lookup.by_fingerprint.len(),
            %candidate_type,
            "built repo lookup"
        );
        lookup
    }

    /// Case-insensitive fingerprint lookup
    #[must_use]
    pub fn by_fingerprint(&self, fingerprint: &str) -> Option<&Repo> {
        if fingerprint.is_empty() {
            return None;
        }
        self.by_fingerprint.get(&fingerprint.to_ascii_uppercase())
    }

    /// Exact lookup of a primary address or mirror
    #[must_use]
    pub fn by_url(&self, url: &str) -> Option<&Repo> {
        self.by_url.get(url)
    }

    /// Decide which add-repo state applies to `url` and `fingerprint`.
    ///
    /// The fingerprint is looked up first, then the normalized URL.
    #[must_use]
    pub fn classify(&self, url: &str, fingerprint: &str, mode: Validation) -> Classification {
        let address = match normalize(url) {
            Ok(address) => address,
            Err(e) if mode == Validation::Commit => {
                tracing::debug!(url, error = %e, "candidate URL is invalid");
                return Classification {
                    state: AddRepoState::InvalidUrl,
                    address: url.to_string(),
                    repo: None,
                };
            }
            Err(_) => url.to_string(),
        };

        let repo = self
            .by_fingerprint(fingerprint)
            .or_else(|| self.by_url(&address))
            .cloned();
        let state = decide(repo.as_ref(), &address, fingerprint);

        Classification {
            state,
            address,
            repo,
        }
    }
}

/// Classify against a freshly built lookup; for one-off checks outside a session
#[must_use]
pub fn classify(url: &str, fingerprint: &str, repos: &[Repo], mode: Validation) -> Classification {
    RepoLookup::build(repos, url).classify(url, fingerprint, mode)
}

fn decide(repo: Option<&Repo>, address: &str, fingerprint: &str) -> AddRepoState {
    let Some(repo) = repo else {
        return AddRepoState::DoesntExist;
    };

    match repo.signing_fingerprint() {
        None if !fingerprint.is_empty() => AddRepoState::ExistsUpgradableToSigned,
        Some(known) if !fingerprints_match(known, fingerprint) => {
            AddRepoState::ExistsFingerprintMismatch
        }
        _ if !repo.serves_url(address) => AddRepoState::ExistsAddMirror,
        _ if repo.inuse => AddRepoState::ExistsEnabled,
        _ => AddRepoState::ExistsDisabled,
    }
}
