//! Searching a host for the actual repository index location

use std::fmt;
use std::sync::Arc;

use fdr_config::{Config, ProbeConfig};
use fdr_errors::{Error, NetworkError};
use fdr_events::{EventEmitter, EventSender, FailureContext, RepoEvent};
use fdr_net::{head_status, NetClient, NetConfig, StatusCode};
use fdr_uri::append_path;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::matcher::RepoLookup;

/// How a probe ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// The signed index answered 200
    Found,
    /// The signed index answered 401; credentials are needed
    AuthRequired,
    /// The fingerprint or a candidate address is already known
    KnownRepo,
    /// A request failed at the transport level; remaining suffixes were skipped
    TransportFailed,
    /// No suffix produced a definitive answer
    Exhausted,
    /// Stopped by the cancellation token
    Cancelled,
}

impl ProbeStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::AuthRequired => "auth_required",
            Self::KnownRepo => "known_repo",
            Self::TransportFailed => "transport_failed",
            Self::Exhausted => "exhausted",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved address and how it was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub address: String,
    pub status: ProbeStatus,
    /// Status of the deciding HEAD request, if one decided the outcome
    pub http_status: Option<u16>,
}

impl ProbeOutcome {
    fn new(address: impl Into<String>, status: ProbeStatus) -> Self {
        Self {
            address: address.into(),
            status,
            http_status: None,
        }
    }

    fn with_http_status(mut self, status: StatusCode) -> Self {
        self.http_status = Some(status.as_u16());
        self
    }

    #[must_use]
    pub fn requires_credentials(&self) -> bool {
        self.status == ProbeStatus::AuthRequired
    }
}

/// Checks a fixed list of path suffixes for a signed repository index.
///
/// Attempts are strictly sequential. Cancellation is observed between
/// attempts; a request already in flight runs to completion.
#[derive(Clone)]
pub struct RepoProber {
    client: NetClient,
    suffixes: Vec<String>,
    index_file: String,
}

impl RepoProber {
    #[must_use]
    pub fn new(client: NetClient, config: &ProbeConfig) -> Self {
        Self {
            client,
            suffixes: config.suffixes.clone(),
            index_file: config.signed_index_file.clone(),
        }
    }

    /// Build a prober with its own HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let client = NetClient::new(NetConfig::from(&config.network))?;
        Ok(Self::new(client, &config.probe))
    }

    /// Run [`RepoProber::probe`] on a background task
    #[must_use]
    pub fn spawn(
        &self,
        candidate: String,
        fingerprint: Option<String>,
        lookup: Arc<RepoLookup>,
        cancel: CancellationToken,
        tx: EventSender,
    ) -> JoinHandle<ProbeOutcome> {
        let prober = self.clone();
        tokio::spawn(async move {
            prober
                .probe(&candidate, fingerprint.as_deref(), &lookup, &cancel, &tx)
                .await
        })
    }

    /// Find where the repository behind `candidate` is hosted.
    ///
    /// Known fingerprints and known candidate addresses short-circuit before
    /// any request is made. Otherwise each suffix is tried in order with a
    /// `HEAD` for the signed index; 200 or 401 stops the search. A transport
    /// failure or an exhausted list resolves to `candidate` itself.
    pub async fn probe(
        &self,
        candidate: &str,
        fingerprint: Option<&str>,
        lookup: &RepoLookup,
        cancel: &CancellationToken,
        tx: &EventSender,
    ) -> ProbeOutcome {
        tx.emit_repo(RepoEvent::ProbeStarted {
            address: candidate.to_string(),
        });

        let outcome = self
            .search(candidate, fingerprint, lookup, cancel, tx)
            .await;

        tracing::info!(
            candidate,
            address = %outcome.address,
            status = %outcome.status,
            "repository probe finished"
        );
        tx.emit_repo(RepoEvent::ProbeFinished {
            address: outcome.address.clone(),
            status: outcome.http_status,
            outcome: outcome.status.to_string(),
        });
        outcome
    }

    async fn search(
        &self,
        candidate: &str,
        fingerprint: Option<&str>,
        lookup: &RepoLookup,
        cancel: &CancellationToken,
        tx: &EventSender,
    ) -> ProbeOutcome {
        if fingerprint.is_some_and(|fp| lookup.by_fingerprint(fp).is_some()) {
            return ProbeOutcome::new(candidate, ProbeStatus::KnownRepo);
        }

        let addresses: Vec<String> = self
            .suffixes
            .iter()
            .map(|suffix| append_path(candidate, suffix))
            .collect();

        if let Some(known) = addresses.iter().find(|a| lookup.by_url(a).is_some()) {
            return ProbeOutcome::new(known.clone(), ProbeStatus::KnownRepo);
        }

        let mut last_progress = candidate.to_string();
        for address in addresses {
            if cancel.is_cancelled() {
                tracing::debug!("probe cancelled, not checking more addresses");
                return ProbeOutcome::new(last_progress, ProbeStatus::Cancelled);
            }

            tracing::debug!(%address, "checking for repository");
            tx.emit_repo(RepoEvent::ProbeAttempt {
                address: address.clone(),
            });
            last_progress.clone_from(&address);

            let index_url = append_path(&address, &self.index_file);
            match head_status(&self.client, &index_url, tx).await {
                Ok(StatusCode::OK) => {
                    return ProbeOutcome::new(address, ProbeStatus::Found)
                        .with_http_status(StatusCode::OK);
                }
                Ok(StatusCode::UNAUTHORIZED) => {
                    return ProbeOutcome::new(address, ProbeStatus::AuthRequired)
                        .with_http_status(StatusCode::UNAUTHORIZED);
                }
                Ok(status) => {
                    tracing::debug!(%address, status = status.as_u16(), "no repository here");
                }
                Err(Error::Network(NetworkError::RateLimited { seconds })) => {
                    tracing::debug!(%address, seconds, "rate limited, trying next address");
                }
                Err(e) => {
                    tracing::warn!(%address, error = %e, "error while searching for repository");
                    let context = FailureContext::from_error(&e);
                    tx.emit_warning_with_context(
                        format!("Error while searching for repo at {address}"),
                        context.message,
                    );
                    return ProbeOutcome::new(candidate, ProbeStatus::TransportFailed);
                }
            }
        }

        ProbeOutcome::new(candidate, ProbeStatus::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_names() {
        assert_eq!(ProbeStatus::AuthRequired.to_string(), "auth_required");
        assert_eq!(ProbeStatus::KnownRepo.as_str(), "known_repo");
    }

    #[test]
    fn test_requires_credentials() {
        let outcome = ProbeOutcome::new("https://h/repo", ProbeStatus::AuthRequired)
            .with_http_status(StatusCode::UNAUTHORIZED);
        assert!(outcome.requires_credentials());
        assert_eq!(outcome.http_status, Some(401));
        assert!(!ProbeOutcome::new("https://h/repo", ProbeStatus::Found).requires_credentials());
    }
}
