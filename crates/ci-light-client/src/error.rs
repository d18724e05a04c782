//! Error types for transport and API access

use thiserror::Error;

/// Failure below the HTTP layer: no status code was received
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not complete within the configured timeout
    #[error("request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    /// The URL could not be turned into a request
    #[error("invalid request for {url}: {reason}")]
    InvalidRequest { url: String, reason: String },

    /// Connection, TLS or body read failure
    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },
}

/// Failure fetching one resource
///
/// Every variant is scoped to a single request. Callers decide how far the
/// failure reaches; the pipeline never lets one escape its unit of work.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Network, timeout or interrupt
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The API answered with something other than 200 OK
    #[error("GitHub API returned non-OK status {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// Missing, empty or unparsable JSON body
    #[error("GitHub API returned an unusable body for {url}: {reason}")]
    EmptyOrMalformedBody { url: String, reason: String },
}

impl FetchError {
    /// Shorthand for an `EmptyOrMalformedBody` error
    pub fn malformed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        FetchError::EmptyOrMalformedBody {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
