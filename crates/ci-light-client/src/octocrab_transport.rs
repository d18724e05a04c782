//! Octocrab-based HTTP transport
//!
//! Direct implementation of the `Transport` trait using octocrab's raw request
//! API. Octocrab supplies connection pooling, TLS and the connect timeout;
//! this transport adds the overall request timeout and leaves status codes
//! uninterpreted.

use crate::error::TransportError;
use crate::transport::{RawResponse, Transport};
use async_trait::async_trait;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use log::debug;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use std::sync::Arc;
use std::time::Duration;

/// Direct HTTP transport using octocrab
///
/// This is the base implementation that makes actual network calls.
/// It can be wrapped by `RetryingTransport` to add bounded retries.
///
/// The octocrab instance is built without credentials; authentication is
/// passed per request through the headers given to [`Transport::get`].
#[derive(Debug, Clone)]
pub struct OctocrabTransport {
    octocrab: Arc<Octocrab>,
    request_timeout: Duration,
}

impl OctocrabTransport {
    /// Create a transport with the given connect and overall request timeouts
    ///
    /// Octocrab's own retry layer is disabled: every call is exactly one
    /// HTTP request, and retries belong to `RetryingTransport`.
    pub fn new(connect_timeout: Duration, request_timeout: Duration) -> octocrab::Result<Self> {
        let octocrab = Octocrab::builder()
            .add_retry_config(RetryConfig::None)
            .set_connect_timeout(Some(connect_timeout))
            .set_read_timeout(Some(request_timeout))
            .build()?;

        Ok(Self::with_octocrab(Arc::new(octocrab), request_timeout))
    }

    /// Create a transport around an existing octocrab instance
    pub fn with_octocrab(octocrab: Arc<Octocrab>, request_timeout: Duration) -> Self {
        Self {
            octocrab,
            request_timeout,
        }
    }
}

#[async_trait]
impl Transport for OctocrabTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<RawResponse, TransportError> {
        debug!("GET {}", url);

        let header_map = build_header_map(url, headers)?;

        let exchange = async {
            let response = self
                .octocrab
                ._get_with_headers(url, Some(header_map))
                .await?;
            let status = response.status().as_u16();
            let body = self.octocrab.body_to_string(response).await?;
            Ok::<_, octocrab::Error>(RawResponse { status, body })
        };

        match tokio::time::timeout(self.request_timeout, exchange).await {
            Ok(Ok(response)) => {
                debug!("GET {} -> {}", url, response.status);
                Ok(response)
            }
            Ok(Err(e)) => Err(TransportError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(TransportError::Timeout {
                url: url.to_string(),
                seconds: self.request_timeout.as_secs(),
            }),
        }
    }
}

/// Convert header pairs into an http `HeaderMap`
fn build_header_map(url: &str, headers: &[(&str, &str)]) -> Result<HeaderMap, TransportError> {
    let invalid = |reason: String| TransportError::InvalidRequest {
        url: url.to_string(),
        reason,
    };

    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| invalid(format!("header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| invalid(format!("header value for '{}': {}", name, e)))?;
        map.insert(name, value);
    }
    Ok(map)
}
