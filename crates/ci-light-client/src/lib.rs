//! GitHub REST access for ci-light
//!
//! This crate provides a trait-based HTTP transport and a thin GitHub API
//! wrapper on top of it. The design follows the decorator pattern, allowing
//! retry behavior to be composed with the base transport.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  GitHubApi                      │
//! │  - url building, auth headers                   │
//! │  - fetch_json() -> Result<Value, FetchError>    │
//! └─────────────────────────────────────────────────┘
//!                        │ Arc<dyn Transport>
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │OctocrabTransport│         │ RetryingTransport   │
//! │ (direct HTTP)   │◄────────│ (decorator)         │
//! └─────────────────┘         └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use ci_light_client::{GitHubApi, OctocrabTransport, RetryPolicy, RetryingTransport};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let direct = OctocrabTransport::new(Duration::from_secs(10), Duration::from_secs(20))?;
//! let transport = RetryingTransport::new(direct, RetryPolicy::default());
//!
//! let api = GitHubApi::new(Arc::new(transport), "https://api.github.com", "token");
//! let pulls = api
//!     .fetch_json(&api.url("/repos/owner/repo/pulls?state=open"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
#[cfg(any(test, feature = "fake"))]
pub mod fake;
pub mod octocrab_transport;
pub mod retry;
pub mod transport;
pub mod types;

/// Default GitHub REST endpoint (public GitHub)
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// REST API version pinned through the `X-GitHub-Api-Version` header
pub const GITHUB_API_VERSION: &str = "2022-11-28";

pub use api::GitHubApi;
pub use error::{FetchError, TransportError};
#[cfg(any(test, feature = "fake"))]
pub use fake::FakeTransport;
pub use octocrab_transport::OctocrabTransport;
pub use retry::{RetryPolicy, RetryingTransport};
pub use transport::{RawResponse, Transport};
pub use types::{
    CheckRunItem, CheckRunsPage, HeadRef, PullRequestItem, WorkflowRunItem, WorkflowRunsPage,
};
