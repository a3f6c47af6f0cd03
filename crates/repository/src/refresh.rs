//! Index refresh boundary

use fdr_events::{EventEmitter, EventSender, RepoEvent};

/// Service that re-downloads repository indexes
pub trait IndexRefresher: Send + Sync {
    /// Request an immediate refresh; returns without waiting for it
    fn refresh_now(&self);
}

/// Refresher that publishes `RefreshRequested` on the event channel for an
/// update service listening on the other end
#[derive(Debug, Clone)]
pub struct ChannelRefresher {
    tx: EventSender,
}

impl ChannelRefresher {
    #[must_use]
    pub fn new(tx: EventSender) -> Self {
        Self { tx }
    }
}

impl EventEmitter for ChannelRefresher {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

impl IndexRefresher for ChannelRefresher {
    fn refresh_now(&self) {
        self.emit_repo(RepoEvent::RefreshRequested);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fdr_events::AppEvent;

    #[test]
    fn test_refresh_emits_event() {
        let (tx, mut rx) = fdr_events::channel();
        ChannelRefresher::new(tx).refresh_now();
        assert!(matches!(
            rx.try_recv(),
            Ok(AppEvent::Repo(RepoEvent::RefreshRequested))
        ));
    }
}
