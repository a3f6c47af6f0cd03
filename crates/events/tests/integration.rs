//! Integration tests for events

#[cfg(test)]
mod tests {
    use fdr_events::*;
    use fdr_types::AddRepoState;

    #[tokio::test]
    async fn test_emitter_helpers() {
        let (tx, mut rx) = channel();

        tx.emit_warning_with_context("search failed", "connection refused");
        tx.emit_debug("test debug");
        tx.emit_repo(RepoEvent::ProbeAttempt {
            address: "https://example.org/fdroid/repo".into(),
        });

        let event1 = rx.recv().await.unwrap();
        assert!(matches!(
            event1,
            AppEvent::General(GeneralEvent::Warning { context: Some(_), .. })
        ));
        assert_eq!(event1.log_level(), EventLevel::Warn);

        let event2 = rx.recv().await.unwrap();
        assert!(matches!(
            event2,
            AppEvent::General(GeneralEvent::DebugLog { .. })
        ));

        let event3 = rx.recv().await.unwrap();
        assert_eq!(event3.event_source(), EventSource::Probe);
        assert_eq!(event3.log_level(), EventLevel::Debug);
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_debug("ignored");
    }

    #[test]
    fn test_event_serialization() {
        let event = AppEvent::Repo(RepoEvent::AddStateChanged {
            from: None,
            to: AddRepoState::ExistsAddMirror,
            repo_name: Some("F-Droid".into()),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "repo");
        assert_eq!(json["event"]["type"], "AddStateChanged");
        assert_eq!(json["event"]["to"], "EXISTS_ADD_MIRROR");
    }

    #[test]
    fn test_failure_context_from_error() {
        let err = fdr_errors::UriError::MissingScheme {
            uri: "bubu1.eu".into(),
        };
        let ctx = FailureContext::from_error(&err);
        assert_eq!(ctx.message, "invalid repository URL");
        assert_eq!(ctx.code.as_deref(), Some("uri.missing_scheme"));
        assert!(!ctx.retryable);
    }
}
