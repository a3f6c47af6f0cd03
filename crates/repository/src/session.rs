//! The add-repository workflow
//!
//! A session snapshots the known repositories, classifies the candidate on
//! every input change, and on commit either creates a new record (after
//! probing the host) or updates and enables the existing one. Rendering is
//! left entirely to the caller, which follows the session through its return
//! values and the event channel.

use std::sync::Arc;

use fdr_errors::Error;
use fdr_events::{EventEmitter, EventSender, RepoEvent};
use fdr_types::{canonical_fingerprint, clean_fingerprint, AddRepoState, NewRepo, Repo, RepoUpdate};
use fdr_uri::{normalize, strip_query_and_fragment, ParseErrorCode, RepoConfig, UriParts};
use tokio_util::sync::CancellationToken;

use crate::matcher::{Classification, RepoLookup, Validation};
use crate::prober::{ProbeStatus, RepoProber};
use crate::refresh::IndexRefresher;
use crate::store::RepoStore;

/// Where the candidate repository came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    /// Typed by the user
    Manual,
    /// Pre-filled from the clipboard
    Clipboard,
    /// Handed over by a link, QR code or NFC tag
    Import,
}

/// Initial values of an add-repo session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInput {
    pub address: String,
    pub fingerprint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub origin: SessionOrigin,
}

impl SessionInput {
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            fingerprint: None,
            username: None,
            password: None,
            origin: SessionOrigin::Manual,
        }
    }

    #[must_use]
    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    fn from_config(config: &RepoConfig, origin: SessionOrigin) -> Self {
        Self {
            address: config.repo_uri_string().to_string(),
            fingerprint: config.fingerprint().map(str::to_string),
            username: config.username().map(str::to_string),
            password: config.password().map(str::to_string),
            origin,
        }
    }

    /// Pre-fill from clipboard text, falling back to an empty `https://`
    /// address when it does not hold a repository URI
    #[must_use]
    pub fn from_clipboard(text: Option<&str>) -> Self {
        let config = RepoConfig::parse(text.map(str::trim));
        if config.is_valid() {
            Self::from_config(&config, SessionOrigin::Clipboard)
        } else {
            Self::from_config(&RepoConfig::default(), SessionOrigin::Clipboard)
        }
    }

    /// Input for a repository handed over from outside the app
    ///
    /// # Errors
    ///
    /// Returns the message key to show when the URI is not a repository URI.
    pub fn from_import(uri: &str) -> Result<Self, ParseErrorCode> {
        let config = RepoConfig::from_uri(uri);
        if config.is_valid() {
            Ok(Self::from_config(&config, SessionOrigin::Import))
        } else {
            Err(config.error().unwrap_or(ParseErrorCode::RepoUrlInvalid))
        }
    }
}

/// Result of a commit or credentials submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new repository record was written
    Created(Repo),
    /// An existing repository was enabled, signed or given a new mirror
    Enabled(Repo),
    /// Nothing to write; the repository is already enabled
    AlreadyEnabled(Repo),
    /// The index at `address` requires credentials; call `submit_credentials`
    AwaitingCredentials { address: String },
    /// The probe found an existing repository; the form shows the new state
    Reclassified(Classification),
    /// The state does not allow a commit; the advisory message stays shown
    Rejected(AddRepoState),
}

#[derive(Debug, Clone)]
struct PendingCredentials {
    address: String,
    fingerprint: Option<String>,
}

/// One run of the add-repository workflow
pub struct AddRepoSession<S: RepoStore, R: IndexRefresher> {
    store: Arc<S>,
    refresher: Arc<R>,
    prober: RepoProber,
    tx: EventSender,
    lookup: Arc<RepoLookup>,
    origin: SessionOrigin,
    username: Option<String>,
    password: Option<String>,
    state: Option<AddRepoState>,
    pending: Option<PendingCredentials>,
    cancel: CancellationToken,
    finished: bool,
    abandoned: bool,
}

impl<S: RepoStore, R: IndexRefresher> EventEmitter for AddRepoSession<S, R> {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

impl<S: RepoStore, R: IndexRefresher> AddRepoSession<S, R> {
    /// Snapshot the known repositories and classify the initial input
    ///
    /// # Errors
    ///
    /// Returns an error if the known repositories cannot be read.
    pub async fn start(
        store: Arc<S>,
        refresher: Arc<R>,
        prober: RepoProber,
        tx: EventSender,
        input: &SessionInput,
    ) -> Result<Self, Error> {
        let repos = store.all().await?;
        let lookup = Arc::new(RepoLookup::build(&repos, &input.address));
        tracing::info!(
            address = %input.address,
            origin = ?input.origin,
            known = repos.len(),
            "add-repo session started"
        );

        let mut session = Self {
            store,
            refresher,
            prober,
            tx,
            lookup,
            origin: input.origin,
            username: input.username.clone(),
            password: input.password.clone(),
            state: None,
            pending: None,
            cancel: CancellationToken::new(),
            finished: false,
            abandoned: false,
        };
        session.update_input(&input.address, input.fingerprint.as_deref().unwrap_or_default());
        Ok(session)
    }

    /// Most recently announced state
    #[must_use]
    pub fn state(&self) -> Option<AddRepoState> {
        self.state
    }

    #[must_use]
    pub fn origin(&self) -> SessionOrigin {
        self.origin
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Credentials that came with the input, for pre-filling a login prompt
    #[must_use]
    pub fn initial_credentials(&self) -> (Option<&str>, Option<&str>) {
        (self.username.as_deref(), self.password.as_deref())
    }

    /// Token that skips the repository search when cancelled
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Skip searching; the repo is created at the address as entered
    pub fn skip_probe(&self) {
        self.cancel.cancel();
    }

    /// Re-classify after the URL or fingerprint input changed
    pub fn update_input(&mut self, url: &str, fingerprint: &str) -> Classification {
        let classification = self.lookup.classify(url, fingerprint, Validation::Live);
        self.announce(&classification);
        classification
    }

    fn announce(&mut self, classification: &Classification) {
        if self.state == Some(classification.state) {
            return;
        }
        tracing::debug!(from = ?self.state, to = %classification.state, "add-repo state changed");
        self.emit_repo(RepoEvent::AddStateChanged {
            from: self.state,
            to: classification.state,
            repo_name: classification.repo.as_ref().map(|r| r.name.clone()),
        });
        self.state = Some(classification.state);
    }

    /// Act on the current input
    ///
    /// # Errors
    ///
    /// Returns `Error::Cancelled` after [`AddRepoSession::cancel`], or an error
    /// if the session already finished, the store rejects a write or the
    /// probe task fails.
    pub async fn commit(&mut self, url: &str, fingerprint: &str) -> Result<CommitOutcome, Error> {
        self.ensure_open()?;
        let fingerprint = clean_fingerprint(fingerprint);
        let classification = self.lookup.classify(
            url,
            fingerprint.as_deref().unwrap_or_default(),
            Validation::Commit,
        );
        self.announce(&classification);

        match classification.state {
            AddRepoState::DoesntExist => {
                self.probe_and_create(&classification.address, fingerprint)
                    .await
            }
            _ => self.apply(classification, fingerprint).await,
        }
    }

    async fn apply(
        &mut self,
        classification: Classification,
        fingerprint: Option<String>,
    ) -> Result<CommitOutcome, Error> {
        match (classification.state, classification.repo) {
            (
                AddRepoState::ExistsDisabled
                | AddRepoState::ExistsUpgradableToSigned
                | AddRepoState::ExistsAddMirror,
                Some(repo),
            ) => {
                self.update_and_enable(&repo, &classification.address, fingerprint.as_deref())
                    .await
            }
            (AddRepoState::ExistsEnabled, Some(repo)) => {
                self.finish(true);
                Ok(CommitOutcome::AlreadyEnabled(repo))
            }
            (state, _) => {
                tracing::info!(%state, "commit rejected");
                Ok(CommitOutcome::Rejected(state))
            }
        }
    }

    async fn probe_and_create(
        &mut self,
        address: &str,
        fingerprint: Option<String>,
    ) -> Result<CommitOutcome, Error> {
        let handle = self.prober.spawn(
            address.to_string(),
            fingerprint.clone(),
            Arc::clone(&self.lookup),
            self.cancel.clone(),
            self.tx.clone(),
        );
        let outcome = handle
            .await
            .map_err(|e| Error::internal(format!("repository probe failed: {e}")))?;

        // A skip during an in-flight request still wins over its answer
        if self.cancel.is_cancelled() {
            tracing::info!(%address, status = %outcome.status, "search skipped, using entered address");
            return self.create(address, fingerprint, None, None).await;
        }

        match outcome.status {
            ProbeStatus::Cancelled => self.create(address, fingerprint, None, None).await,
            ProbeStatus::AuthRequired => {
                tracing::info!(address = %outcome.address, "repository requires credentials");
                self.pending = Some(PendingCredentials {
                    address: outcome.address.clone(),
                    fingerprint,
                });
                Ok(CommitOutcome::AwaitingCredentials {
                    address: outcome.address,
                })
            }
            ProbeStatus::KnownRepo => {
                let classification = self.lookup.classify(
                    &outcome.address,
                    fingerprint.as_deref().unwrap_or_default(),
                    Validation::Live,
                );
                self.announce(&classification);
                Ok(CommitOutcome::Reclassified(classification))
            }
            ProbeStatus::Found | ProbeStatus::TransportFailed | ProbeStatus::Exhausted => {
                self.create(&outcome.address, fingerprint, None, None).await
            }
        }
    }

    /// Finish a commit that stopped for credentials
    ///
    /// # Errors
    ///
    /// Returns `Error::Cancelled` after [`AddRepoSession::cancel`], or an error
    /// if no credentials were requested or the store rejects the new record.
    pub async fn submit_credentials(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<CommitOutcome, Error> {
        if self.abandoned {
            return Err(Error::Cancelled);
        }
        let pending = self
            .pending
            .take()
            .ok_or_else(|| Error::internal("no credentials were requested"))?;
        self.create(
            &pending.address,
            pending.fingerprint,
            Some(username),
            Some(password),
        )
        .await
    }

    /// Abandon the session without writing anything
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.pending = None;
        if !self.finished {
            tracing::info!("add-repo session cancelled");
            self.abandoned = true;
            self.finish(false);
        }
    }

    fn ensure_open(&self) -> Result<(), Error> {
        if self.abandoned {
            Err(Error::Cancelled)
        } else if self.finished {
            Err(Error::internal("add-repo session already finished"))
        } else {
            Ok(())
        }
    }

    async fn create(
        &mut self,
        address: &str,
        fingerprint: Option<String>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<CommitOutcome, Error> {
        let fingerprint = fingerprint
            .or_else(|| UriParts::parse(address).query_param("fingerprint"))
            .and_then(|fp| canonical_fingerprint(&fp));
        let address = normalize(address).map_or_else(
            |_| address.to_string(),
            |normalized| strip_query_and_fragment(&normalized),
        );
        let (username, password) = match (username, password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => {
                (Some(u.to_string()), Some(p.to_string()))
            }
            _ => (None, None),
        };

        let repo = self
            .store
            .insert(NewRepo {
                address: address.clone(),
                fingerprint,
                username,
                password,
            })
            .await?;
        tracing::info!(%address, signed = repo.fingerprint.is_some(), "repository added");
        self.emit_repo(RepoEvent::RepoCreated { address });
        self.finish(true);
        Ok(CommitOutcome::Created(repo))
    }

    async fn update_and_enable(
        &mut self,
        repo: &Repo,
        url: &str,
        fingerprint: Option<&str>,
    ) -> Result<CommitOutcome, Error> {
        tracing::debug!(url, repo = %repo.address, "enabling existing repo");
        let mut update = RepoUpdate {
            inuse: Some(true),
            fingerprint: Some(fingerprint.and_then(canonical_fingerprint)),
            user_mirrors: None,
        };

        let add_mirror = url != repo.address && !repo.mirror_list().any(|m| m == url);
        if add_mirror {
            let mut user_mirrors = repo.user_mirrors.clone();
            user_mirrors.push(url.to_string());
            update.user_mirrors = Some(user_mirrors);
        }

        let updated = self.store.update(repo.id, update).await?;
        if add_mirror {
            self.emit_repo(RepoEvent::MirrorAdded {
                address: updated.address.clone(),
                mirror: url.to_string(),
            });
        }
        self.emit_repo(RepoEvent::RepoEnabled {
            address: updated.address.clone(),
        });
        self.finish(true);
        Ok(CommitOutcome::Enabled(updated))
    }

    fn finish(&mut self, refresh: bool) {
        if refresh {
            self.refresher.refresh_now();
        }
        self.finished = true;
        self.emit_repo(RepoEvent::SessionFinished {
            imported: self.origin == SessionOrigin::Import,
        });
    }
}

/// Switch a repository on or off.
///
/// Enabling requests an index refresh; disabling removes the repo's apps.
/// Nothing is written when the repo is already in the requested state.
///
/// # Errors
///
/// Returns an error if the store rejects the update or the purge.
pub async fn set_repo_enabled<S, R>(
    store: &S,
    refresher: &R,
    tx: &EventSender,
    repo: &Repo,
    enabled: bool,
) -> Result<Repo, Error>
where
    S: RepoStore + ?Sized,
    R: IndexRefresher + ?Sized,
{
    if repo.inuse == enabled {
        return Ok(repo.clone());
    }

    let updated = store
        .update(
            repo.id,
            RepoUpdate {
                inuse: Some(enabled),
                ..RepoUpdate::default()
            },
        )
        .await?;

    if enabled {
        refresher.refresh_now();
        tx.emit_repo(RepoEvent::RepoEnabled {
            address: updated.address.clone(),
        });
    } else {
        store.purge_apps(repo.id).await?;
        tx.emit_repo(RepoEvent::RepoDisabled {
            address: updated.address.clone(),
        });
    }
    tracing::info!(address = %updated.address, enabled, "repository toggled");
    Ok(updated)
}
