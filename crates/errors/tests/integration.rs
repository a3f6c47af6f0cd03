//! Integration tests for error types

#[cfg(test)]
mod tests {
    use fdr_errors::*;

    #[test]
    fn test_error_conversion() {
        let net_err = NetworkError::Timeout {
            url: "https://example.com".into(),
        };
        let err: Error = net_err.into();
        assert!(matches!(err, Error::Network(_)));

        let uri_err = UriError::invalid("bubu1.eu", "no scheme");
        let err: Error = uri_err.into();
        assert!(matches!(err, Error::Uri(UriError::InvalidUri { .. })));
    }

    #[test]
    fn test_error_display() {
        let err = StorageError::RepoNotFound { id: "7".into() };
        assert_eq!(err.to_string(), "repository not found: 7");
    }

    #[test]
    fn test_uri_errors_share_one_user_message() {
        let missing = UriError::MissingHost {
            uri: "https://".into(),
        };
        let unsupported = UriError::UnsupportedScheme {
            scheme: "ftp".into(),
        };
        assert_eq!(missing.user_message(), "invalid repository URL");
        assert_eq!(unsupported.user_message(), "invalid repository URL");
        assert_eq!(unsupported.user_code(), Some("uri.unsupported_scheme"));
    }

    #[test]
    fn test_transport_failure_is_retryable() {
        let err: Error = NetworkError::TransportFailure("reset".into()).into();
        assert!(err.is_retryable());
        assert_eq!(err.user_code(), Some("network.transport_failure"));
        assert!(!Error::Cancelled.is_retryable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(err.user_code(), Some("error.io"));
    }
}
