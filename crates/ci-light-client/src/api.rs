//! GitHub REST API access
//!
//! `GitHubApi` owns the base URL and credentials, attaches the required
//! headers to every request and turns raw responses into either a JSON value
//! or a [`FetchError`].

use crate::error::FetchError;
use crate::transport::Transport;
use crate::GITHUB_API_VERSION;
use log::warn;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Media type requested from the REST API
pub const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";

/// Authenticated access to one GitHub REST endpoint
#[derive(Clone)]
pub struct GitHubApi {
    transport: Arc<dyn Transport>,
    base_url: String,
    authorization: String,
}

impl fmt::Debug for GitHubApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GitHubApi {
    /// Create an API handle
    ///
    /// # Arguments
    ///
    /// * `transport` - Shared HTTP transport
    /// * `base_url` - REST root, e.g. `https://api.github.com`
    /// * `token` - Bearer token sent with every request
    pub fn new(transport: Arc<dyn Transport>, base_url: &str, token: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: format!("Bearer {}", token),
        }
    }

    /// Absolute URL for an API path such as `/users/octocat/repos`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn headers(&self) -> [(&str, &str); 3] {
        [
            ("Accept", ACCEPT_GITHUB_JSON),
            ("Authorization", self.authorization.as_str()),
            ("X-GitHub-Api-Version", GITHUB_API_VERSION),
        ]
    }

    /// GET `url` and return the body of a 200 response
    ///
    /// Any other status, a transport failure, or an empty body is an error.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.transport.get(url, &self.headers()).await?;

        if !response.is_ok() {
            if !response.body.is_empty() {
                warn!("GitHub API returned {} for {}: {}", response.status, url, response.body);
            }
            return Err(FetchError::UnexpectedStatus {
                status: response.status,
                url: url.to_string(),
            });
        }

        if response.body.trim().is_empty() {
            return Err(FetchError::malformed(url, "empty body"));
        }

        Ok(response.body)
    }

    /// GET `url` and parse the body as JSON
    pub async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let body = self.fetch(url).await?;
        serde_json::from_str(&body).map_err(|e| FetchError::malformed(url, e.to_string()))
    }

    /// GET `url` and deserialize the body into `T`
    pub async fn fetch_as<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let body = self.fetch(url).await?;
        serde_json::from_str(&body).map_err(|e| FetchError::malformed(url, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::fake::FakeTransport;
    use crate::types::CheckRunsPage;

    const URL: &str = "https://api.github.com/repos/a/b/pulls";

    fn api(fake: &FakeTransport) -> GitHubApi {
        GitHubApi::new(Arc::new(fake.clone()), "https://api.github.com/", "secret")
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let fake = FakeTransport::new();
        assert_eq!(
            api(&fake).url("/users/octocat/repos"),
            "https://api.github.com/users/octocat/repos"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let fake = FakeTransport::new();
        let debug = format!("{:?}", api(&fake));
        assert!(!debug.contains("secret"));
    }

    #[tokio::test]
    async fn test_sends_required_headers() {
        let fake = FakeTransport::new();
        fake.ok_json(URL, "[]");

        api(&fake).fetch_json(URL).await.unwrap();

        let request = &fake.requests()[0];
        let header = |name: &str| {
            request
                .headers
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(header("Accept").as_deref(), Some("application/vnd.github+json"));
        assert_eq!(header("Authorization").as_deref(), Some("Bearer secret"));
        assert_eq!(header("X-GitHub-Api-Version").as_deref(), Some("2022-11-28"));
    }

    #[tokio::test]
    async fn test_non_ok_status_is_unexpected_status() {
        let fake = FakeTransport::new();
        fake.status(URL, 403);

        let err = api(&fake).fetch_json(URL).await.unwrap_err();

        assert_eq!(
            err,
            FetchError::UnexpectedStatus {
                status: 403,
                url: URL.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_body_is_malformed() {
        let fake = FakeTransport::new();
        fake.ok_json(URL, "  ");

        let err = api(&fake).fetch_json(URL).await.unwrap_err();

        assert!(matches!(err, FetchError::EmptyOrMalformedBody { .. }));
    }

    #[tokio::test]
    async fn test_unparsable_body_is_malformed() {
        let fake = FakeTransport::new();
        fake.ok_json(URL, "<html>");

        let err = api(&fake).fetch_json(URL).await.unwrap_err();

        assert!(matches!(err, FetchError::EmptyOrMalformedBody { .. }));
    }

    #[tokio::test]
    async fn test_transport_failure_is_passed_through() {
        let fake = FakeTransport::new();
        fake.push(
            URL,
            Err(TransportError::Timeout {
                url: URL.to_string(),
                seconds: 20,
            }),
        );

        let err = api(&fake).fetch_json(URL).await.unwrap_err();

        assert!(matches!(err, FetchError::Transport(TransportError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_fetch_as_deserializes() {
        let fake = FakeTransport::new();
        fake.ok_json(
            URL,
            r#"{"total_count":1,"check_runs":[{"name":"ci","status":"completed","conclusion":"success"}]}"#,
        );

        let page: CheckRunsPage = api(&fake).fetch_as(URL).await.unwrap();

        assert_eq!(page.check_runs.len(), 1);
        assert_eq!(page.check_runs[0].name.as_deref(), Some("ci"));
    }
}
