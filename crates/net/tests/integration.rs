//! Integration tests for net crate

#[cfg(test)]
mod tests {
    use fdr_events::{channel, AppEvent, GeneralEvent};
    use fdr_net::*;
    use httpmock::prelude::*;
    use httpmock::Method::HEAD;
    use std::time::Duration;

    #[tokio::test]
    async fn test_head_status_reports_any_status() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        let found = server.mock(|when, then| {
            when.method(HEAD).path("/fdroid/repo/index-v1.jar");
            then.status(200);
        });
        server.mock(|when, then| {
            when.method(HEAD).path("/private/index-v1.jar");
            then.status(401);
        });
        server.mock(|when, then| {
            when.method(HEAD).path("/missing/index-v1.jar");
            then.status(404);
        });

        let client = NetClient::with_defaults().unwrap();

        let status = head_status(&client, &server.url("/fdroid/repo/index-v1.jar"), &tx)
            .await
            .unwrap();
        assert_eq!(status.as_u16(), 200);
        found.assert();

        let status = head_status(&client, &server.url("/private/index-v1.jar"), &tx)
            .await
            .unwrap();
        assert_eq!(status.as_u16(), 401);

        let status = head_status(&client, &server.url("/missing/index-v1.jar"), &tx)
            .await
            .unwrap();
        assert_eq!(status.as_u16(), 404);
    }

    #[tokio::test]
    async fn test_head_status_emits_debug_event() {
        let server = MockServer::start();
        let (tx, mut rx) = channel();

        server.mock(|when, then| {
            when.method(HEAD).path("/repo/index-v1.jar");
            then.status(200);
        });

        let client = NetClient::with_defaults().unwrap();
        let url = server.url("/repo/index-v1.jar");
        head_status(&client, &url, &tx).await.unwrap();

        let mut saw_debug = false;
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::General(GeneralEvent::DebugLog { message, .. }) = event {
                saw_debug |= message.contains(&url);
            }
        }
        assert!(saw_debug);
    }

    #[tokio::test]
    async fn test_rate_limited_with_retry_after() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        server.mock(|when, then| {
            when.method(HEAD).path("/busy/index-v1.jar");
            then.status(429).header("retry-after", "30");
        });

        let client = NetClient::with_defaults().unwrap();
        let error = head_status(&client, &server.url("/busy/index-v1.jar"), &tx)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            fdr_errors::Error::Network(fdr_errors::NetworkError::RateLimited { seconds: 30 })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let (tx, _rx) = channel();
        let client = NetClient::new(NetConfig {
            connect_timeout: Duration::from_secs(2),
            timeout: Duration::from_secs(2),
            ..NetConfig::default()
        })
        .unwrap();

        let error = head_status(&client, "http://127.0.0.1:1/repo/index-v1.jar", &tx)
            .await
            .unwrap_err();
        assert!(matches!(error, fdr_errors::Error::Network(_)));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let (tx, _rx) = channel();
        let client = NetClient::with_defaults().unwrap();

        let error = head_status(&client, "not a url", &tx).await.unwrap_err();
        assert!(matches!(
            error,
            fdr_errors::Error::Network(fdr_errors::NetworkError::InvalidUrl(_))
        ));
    }
}
