//! GitHub CI state on an LED ribbon
//!
//! Two pipelines share the same building blocks:
//!
//! - **pull-requests**: enumerate a user's repositories ([`ResourcePager`]),
//!   list open pull requests of each ([`PullRequestScanner`]), evaluate their
//!   check runs ([`CheckRunEvaluator`]) and show one slot per pull request.
//! - **workflow-runs**: poll the recent workflow runs of one repository
//!   ([`WorkflowRunMonitor`]) and show one slot per run.
//!
//! Failures are contained to the unit that failed. A pull request whose checks
//! cannot be fetched shows as `Unknown`, a repository whose pull requests
//! cannot be listed adds nothing, and a failed enumeration keeps what was
//! already found.

pub mod aggregator;
pub mod checks;
pub mod fanout;
pub mod pager;
pub mod pipeline;
pub mod pulls;
pub mod ribbon;
pub mod status;
pub mod workflow;

pub use aggregator::{AggregateReport, RepositoryAggregator};
pub use checks::{CheckRunEvaluator, CheckVerdict};
pub use pager::{Paged, ResourcePager, StopReason};
pub use pipeline::{build_api, exit_code, Cycle, Pipeline};
pub use pulls::{PullRequestScanner, PullRequestSummary};
pub use ribbon::{ConsoleIndicator, Indicator, Ribbon};
pub use status::{CheckStatus, DisplayStatus, WorkflowStatus};
pub use workflow::{Tally, WorkflowReport, WorkflowRunMonitor};
