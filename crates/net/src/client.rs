//! Pooled HTTP client for index probing

use std::time::Duration;

use fdr_config::NetworkConfig;
use fdr_errors::{Error, NetworkError};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response, StatusCode};

/// Settings of a [`NetClient`]
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    /// Extra attempts after a transport failure; 0 fails on the first one
    pub retry_count: u32,
    /// Base delay, multiplied by the attempt number
    pub retry_delay: Duration,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self::from(&NetworkConfig::default())
    }
}

impl From<&NetworkConfig> for NetConfig {
    fn from(config: &NetworkConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout),
            connect_timeout: Duration::from_secs(config.connect_timeout),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 4,
            retry_count: config.retries,
            retry_delay: Duration::from_secs(config.retry_delay),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// HTTP client shared by all probes of a session
#[derive(Clone)]
pub struct NetClient {
    client: Client,
    config: NetConfig,
}

impl NetClient {
    /// Build the underlying connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend or the client settings are rejected.
    pub fn new(config: NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()
            .map_err(|e| NetworkError::TransportFailure(format!("cannot build client: {e}")))?;

        Ok(Self { client, config })
    }

    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(NetConfig::default())
    }

    #[must_use]
    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    /// Send a `HEAD` request and return the response status.
    ///
    /// Every HTTP status counts as an answer. Transport failures are retried
    /// up to `retry_count` times when they look transient.
    ///
    /// # Errors
    ///
    /// Returns `RateLimited` for a 429 carrying `Retry-After`, and a
    /// `Timeout`, `ConnectionRefused` or `TransportFailure` once the attempts
    /// are used up.
    pub async fn head_status(&self, url: &str) -> Result<StatusCode, Error> {
        let mut attempt = 0;
        loop {
            match self.client.head(url).send().await {
                Ok(response) => {
                    if let Some(seconds) = retry_after(&response) {
                        return Err(NetworkError::RateLimited { seconds }.into());
                    }
                    return Ok(response.status());
                }
                Err(e) if attempt < self.config.retry_count && is_transient(&e) => {
                    attempt += 1;
                    tracing::debug!(url, attempt, error = %e, "HEAD failed, retrying");
                    tokio::time::sleep(self.config.retry_delay * attempt).await;
                }
                Err(e) => return Err(transport_error(url, &e)),
            }
        }
    }
}

/// Seconds to wait, when the server rate limited the request
fn retry_after(response: &Response) -> Option<u64> {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return None;
    }
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn is_transient(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_request()
}

fn transport_error(url: &str, error: &reqwest::Error) -> Error {
    let network = if error.is_timeout() {
        NetworkError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        NetworkError::ConnectionRefused(error.to_string())
    } else {
        NetworkError::TransportFailure(error.to_string())
    };
    network.into()
}
