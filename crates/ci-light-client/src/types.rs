//! GitHub API data transfer objects
//!
//! Only the fields the status pipeline reads are modelled. Status and
//! conclusion values are kept as raw strings; mapping them onto semantic
//! states is the job of the consumer, which must accept values GitHub adds
//! later.

use serde::{Deserialize, Serialize};

/// One item of `GET /repos/{repo}/pulls`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestItem {
    /// PR number (e.g., 123)
    pub number: u64,

    /// PR title
    #[serde(default)]
    pub title: String,

    /// Head branch reference, carrying the commit the checks ran on
    pub head: HeadRef,
}

/// Head reference of a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadRef {
    /// HEAD commit SHA
    pub sha: String,
}

/// Body of `GET /repos/{repo}/commits/{sha}/check-runs`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckRunsPage {
    #[serde(default)]
    pub total_count: u64,

    #[serde(default)]
    pub check_runs: Vec<CheckRunItem>,
}

/// A CI check run from the GitHub API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRunItem {
    /// Name of the check (e.g., "build", "test")
    #[serde(default)]
    pub name: Option<String>,

    /// Raw status ("queued", "in_progress", "completed", ...)
    #[serde(default)]
    pub status: Option<String>,

    /// Raw conclusion, null until the check has completed
    #[serde(default)]
    pub conclusion: Option<String>,
}

/// Body of `GET /repos/{repo}/actions/runs`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowRunsPage {
    #[serde(default)]
    pub total_count: u64,

    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRunItem>,
}

/// A GitHub Actions workflow run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRunItem {
    /// Workflow run ID
    #[serde(default)]
    pub id: u64,

    /// Name of the workflow
    #[serde(default)]
    pub name: Option<String>,

    /// Raw run status
    #[serde(default)]
    pub status: Option<String>,

    /// Raw conclusion, only set when completed
    #[serde(default)]
    pub conclusion: Option<String>,
}
