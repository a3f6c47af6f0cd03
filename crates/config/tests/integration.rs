//! Integration tests for config

#[cfg(test)]
mod tests {
    use fdr_config::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.probe.suffixes, vec!["", "fdroid/repo", "repo"]);
        assert_eq!(config.probe.signed_index_file, "index-v1.jar");
        assert_eq!(config.network.retries, 0);
        assert!(config.network.user_agent.starts_with("fdroid-repo/"));
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[network]
timeout = 5
retries = 2

[probe]
suffixes = ["", "repo"]
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.network.timeout, 5);
        assert_eq!(config.network.retries, 2);
        assert_eq!(config.network.connect_timeout, 10);
        assert_eq!(config.probe.suffixes, vec!["", "repo"]);
        assert_eq!(config.probe.signed_index_file, "index-v1.jar");
    }

    #[tokio::test]
    async fn test_invalid_toml_is_parse_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[network\ntimeout = ").unwrap();

        let err = Config::load_from_file(temp_file.path()).await.unwrap_err();
        assert!(matches!(
            err,
            fdr_errors::Error::Config(fdr_errors::ConfigError::ParseError { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = Config::load_or_default(Some(&path)).await.unwrap_err();
        assert!(matches!(
            err,
            fdr_errors::Error::Config(fdr_errors::ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::set_var("FDR_NETWORK_RETRIES", "4");
        std::env::set_var("FDR_SIGNED_INDEX_FILE", "entry.jar");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.network.retries, 4);
        assert_eq!(config.probe.signed_index_file, "entry.jar");

        std::env::remove_var("FDR_NETWORK_RETRIES");
        std::env::remove_var("FDR_SIGNED_INDEX_FILE");
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::set_var("FDR_NETWORK_TIMEOUT", "soon");

        let mut config = Config::default();
        let result = config.merge_env();
        assert!(result.is_err());

        std::env::remove_var("FDR_NETWORK_TIMEOUT");
    }
}
