//! HTTP transport trait
//!
//! The transport is the only component that performs network I/O. Everything
//! above it receives an `Arc<dyn Transport>` so tests can substitute a fake.

use crate::error::TransportError;
use async_trait::async_trait;
use std::sync::Arc;

/// Status code and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body decoded as UTF-8
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 200 OK, the only status the API wrapper accepts
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Capability to issue GET requests
///
/// A response with any status code is `Ok`; only failures where no response
/// was received are errors. Interpreting the status is left to the caller.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so one transport can be shared by
/// concurrently running scans.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a GET request to an absolute URL with the given headers
    async fn get(&self, url: &str, headers: &[(&str, &str)])
        -> Result<RawResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<RawResponse, TransportError> {
        (**self).get(url, headers).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_response_is_ok() {
        assert!(RawResponse::new(200, "[]").is_ok());
        assert!(!RawResponse::new(201, "{}").is_ok());
        assert!(!RawResponse::new(404, "").is_ok());
    }
}
