//! One poll cycle, parameterized by [`Mode`]

use crate::aggregator::{AggregateReport, RepositoryAggregator};
use crate::pager::ResourcePager;
use crate::pulls::PullRequestScanner;
use crate::ribbon::{Indicator, Ribbon};
use crate::status::WorkflowStatus;
use crate::workflow::{WorkflowReport, WorkflowRunMonitor};
use anyhow::{Context, Result};
use ci_light_client::{FetchError, GitHubApi, OctocrabTransport, RetryPolicy, RetryingTransport};
use ci_light_config::{AppConfig, Mode};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

/// Exit code for a startup or configuration error
pub const EXIT_STARTUP: i32 = 1;
pub const EXIT_UNEXPECTED_STATUS: i32 = 3;
pub const EXIT_TRANSPORT: i32 = 4;
pub const EXIT_MALFORMED_BODY: i32 = 5;

/// Process exit code for a failed single-shot run
pub fn exit_code(err: &FetchError) -> i32 {
    match err {
        FetchError::UnexpectedStatus { .. } => EXIT_UNEXPECTED_STATUS,
        FetchError::Transport(_) => EXIT_TRANSPORT,
        FetchError::EmptyOrMalformedBody { .. } => EXIT_MALFORMED_BODY,
    }
}

/// Build the production API client: octocrab transport wrapped in retries
pub fn build_api(config: &AppConfig, token: &str) -> Result<GitHubApi> {
    let direct = OctocrabTransport::new(
        Duration::from_secs(config.connect_timeout_secs),
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("Failed to build HTTP client")?;

    let policy = RetryPolicy {
        max_retries: config.max_retries,
        initial_backoff: Duration::from_millis(config.retry_backoff_ms),
    };
    debug!(
        "HTTP client: connect timeout {}s, request timeout {}s, {} retries",
        config.connect_timeout_secs, config.request_timeout_secs, policy.max_retries
    );

    let transport = RetryingTransport::new(direct, policy);
    Ok(GitHubApi::new(Arc::new(transport), &config.api_url, token))
}

/// What a single cycle produced
#[derive(Debug, Clone)]
pub enum Cycle {
    PullRequests(AggregateReport),
    WorkflowRuns(Result<WorkflowReport, FetchError>),
}

impl Cycle {
    /// Show the cycle on the ribbon
    ///
    /// A failed workflow poll shows as an empty list.
    pub fn render<I: Indicator>(&self, ribbon: &mut Ribbon<I>) {
        match self {
            Cycle::PullRequests(report) => ribbon.update(&report.statuses()),
            Cycle::WorkflowRuns(Ok(report)) => ribbon.update(&report.statuses),
            Cycle::WorkflowRuns(Err(_)) => ribbon.update::<WorkflowStatus>(&[]),
        }
    }

    /// Error that ends a single-shot run, if any
    pub fn failure(&self) -> Option<&FetchError> {
        match self {
            Cycle::WorkflowRuns(Err(err)) => Some(err),
            _ => None,
        }
    }
}

/// The configured pipeline
#[derive(Debug, Clone)]
pub enum Pipeline {
    PullRequests {
        aggregator: RepositoryAggregator,
        username: String,
    },
    WorkflowRuns {
        monitor: WorkflowRunMonitor,
        repository: String,
    },
}

impl Pipeline {
    /// Assemble the pipeline for `config.mode` on top of `api`
    ///
    /// `config` is expected to be validated already.
    pub fn new(config: &AppConfig, api: GitHubApi) -> Result<Self> {
        let pipeline = match config.mode {
            Mode::PullRequests => {
                let pager = ResourcePager::new(api.clone(), config.page_size, config.max_pages);
                let scanner = PullRequestScanner::new(api, config.concurrency);
                Pipeline::PullRequests {
                    aggregator: RepositoryAggregator::new(pager, scanner, config.concurrency),
                    username: config.username.clone(),
                }
            }
            Mode::WorkflowRuns => {
                let repository = config
                    .repository
                    .clone()
                    .context("repository is required in workflow-runs mode")?;
                Pipeline::WorkflowRuns {
                    monitor: WorkflowRunMonitor::new(api, config.workflow_run_limit),
                    repository,
                }
            }
        };
        Ok(pipeline)
    }

    pub fn mode(&self) -> Mode {
        match self {
            Pipeline::PullRequests { .. } => Mode::PullRequests,
            Pipeline::WorkflowRuns { .. } => Mode::WorkflowRuns,
        }
    }

    /// Run one cycle
    pub async fn run_cycle(&self) -> Cycle {
        match self {
            Pipeline::PullRequests {
                aggregator,
                username,
            } => Cycle::PullRequests(aggregator.run(username).await),
            Pipeline::WorkflowRuns {
                monitor,
                repository,
            } => {
                let polled = monitor.poll(repository).await;
                if let Err(err) = &polled {
                    warn!("Failed to poll workflow runs of {}: {}", repository, err);
                }
                Cycle::WorkflowRuns(polled)
            }
        }
    }
}
