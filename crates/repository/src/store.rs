//! Persistence boundary for repository records

use fdr_errors::{Error, StorageError};
use fdr_types::{NewRepo, Repo, RepoId, RepoUpdate};
use fdr_uri::UriParts;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Storage of known repositories.
///
/// The add-repo workflow only reads a snapshot at session start and writes
/// through `insert` and `update`; it never mutates records in place.
#[async_trait::async_trait]
pub trait RepoStore: Send + Sync {
    async fn all(&self) -> Result<Vec<Repo>, Error>;
    async fn find_by_address(&self, address: &str) -> Result<Option<Repo>, Error>;
    async fn insert(&self, repo: NewRepo) -> Result<Repo, Error>;
    async fn update(&self, id: RepoId, update: RepoUpdate) -> Result<Repo, Error>;
    /// Remove all apps indexed from this repo
    async fn purge_apps(&self, id: RepoId) -> Result<(), Error>;
}

/// In-process repository store
#[derive(Debug, Default)]
pub struct MemoryRepoStore {
    repos: RwLock<Vec<Repo>>,
    purged: RwLock<Vec<RepoId>>,
}

impl MemoryRepoStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_repos(repos: Vec<Repo>) -> Self {
        Self {
            repos: RwLock::new(repos),
            purged: RwLock::default(),
        }
    }

    /// Repos whose apps were purged, in call order
    pub async fn purged_apps(&self) -> Vec<RepoId> {
        self.purged.read().await.clone()
    }
}

/// Display name for a freshly added repo: its host, else the address itself
fn name_for(address: &str) -> String {
    UriParts::parse(address)
        .host()
        .filter(|h| !h.is_empty())
        .unwrap_or(address)
        .to_string()
}

#[async_trait::async_trait]
impl RepoStore for MemoryRepoStore {
    async fn all(&self) -> Result<Vec<Repo>, Error> {
        Ok(self.repos.read().await.clone())
    }

    async fn find_by_address(&self, address: &str) -> Result<Option<Repo>, Error> {
        Ok(self
            .repos
            .read()
            .await
            .iter()
            .find(|r| r.address == address)
            .cloned())
    }

    async fn insert(&self, repo: NewRepo) -> Result<Repo, Error> {
        let mut repos = self.repos.write().await;
        if repos.iter().any(|r| r.address == repo.address) {
            return Err(StorageError::DuplicateAddress {
                address: repo.address,
            }
            .into());
        }

        let record = Repo {
            id: Uuid::new_v4(),
            name: name_for(&repo.address),
            address: repo.address,
            fingerprint: repo.fingerprint,
            mirrors: Vec::new(),
            user_mirrors: Vec::new(),
            inuse: true,
            username: repo.username,
            password: repo.password,
        };
        repos.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: RepoId, update: RepoUpdate) -> Result<Repo, Error> {
        let mut repos = self.repos.write().await;
        let repo = repos
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StorageError::RepoNotFound { id: id.to_string() })?;

        if let Some(inuse) = update.inuse {
            repo.inuse = inuse;
        }
        if let Some(fingerprint) = update.fingerprint {
            repo.fingerprint = fingerprint;
        }
        if let Some(user_mirrors) = update.user_mirrors {
            repo.user_mirrors = user_mirrors;
        }
        Ok(repo.clone())
    }

    async fn purge_apps(&self, id: RepoId) -> Result<(), Error> {
        if !self.repos.read().await.iter().any(|r| r.id == id) {
            return Err(StorageError::RepoNotFound { id: id.to_string() }.into());
        }
        self.purged.write().await.push(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_repo(address: &str) -> NewRepo {
        NewRepo {
            address: address.to_string(),
            fingerprint: None,
            username: None,
            password: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryRepoStore::new();
        let repo = store
            .insert(new_repo("https://f-droid.org/repo"))
            .await
            .unwrap();
        assert_eq!(repo.name, "f-droid.org");
        assert!(repo.inuse);

        let found = store
            .find_by_address("https://f-droid.org/repo")
            .await
            .unwrap();
        assert_eq!(found, Some(repo));
        assert!(store
            .find_by_address("https://f-droid.org/archive")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_address_rejected() {
        let store = MemoryRepoStore::new();
        store.insert(new_repo("https://h/repo")).await.unwrap();
        let err = store.insert(new_repo("https://h/repo")).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::DuplicateAddress { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_applies_only_set_fields() {
        let store = MemoryRepoStore::new();
        let repo = store.insert(new_repo("https://h/repo")).await.unwrap();

        let updated = store
            .update(
                repo.id,
                RepoUpdate {
                    inuse: Some(false),
                    ..RepoUpdate::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.inuse);
        assert_eq!(updated.fingerprint, None);
        assert!(updated.user_mirrors.is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_repo() {
        let store = MemoryRepoStore::new();
        let err = store
            .update(Uuid::new_v4(), RepoUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Storage(StorageError::RepoNotFound { .. })));
    }

    #[test]
    fn test_name_for() {
        assert_eq!(name_for("https://Guardianproject.info/fdroid/repo"), "Guardianproject.info");
        assert_eq!(name_for("not-a-url"), "not-a-url");
    }
}
