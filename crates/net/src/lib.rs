#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for fdroid-repo
//!
//! This crate handles the HTTP side of repository discovery: `HEAD`
//! requests against candidate index locations, with connection pooling and
//! retry logic.

mod client;

pub use client::{NetClient, NetConfig};
pub use reqwest::StatusCode;

use fdr_errors::{Error, NetworkError};
use fdr_events::{EventEmitter, EventSender};
use url::Url;

/// Issue a `HEAD` request and report the response status.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the request fails at the
/// transport level. Non-success statuses are returned as `Ok`.
pub async fn head_status(
    client: &NetClient,
    url: &str,
    tx: &EventSender,
) -> Result<StatusCode, Error> {
    parse_url(url)?;
    tx.emit_debug(format!("HEAD {url}"));

    let status = client.head_status(url).await?;
    tracing::debug!(url, status = status.as_u16(), "HEAD completed");
    Ok(status)
}

/// Parse and validate a URL
///
/// # Errors
///
/// Returns an error if the URL string is malformed or invalid according to RFC 3986.
pub fn parse_url(url: &str) -> Result<Url, Error> {
    Url::parse(url).map_err(|e| NetworkError::InvalidUrl(e.to_string()).into())
}
