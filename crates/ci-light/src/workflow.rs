//! Recent workflow runs of a single repository

use crate::status::WorkflowStatus;
use ci_light_client::{FetchError, GitHubApi, WorkflowRunsPage};
use log::info;

/// Count of runs that are still busy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub in_progress: usize,
    pub queued: usize,
}

impl Tally {
    /// True if any run is queued or in progress
    pub fn is_busy(&self) -> bool {
        self.in_progress + self.queued > 0
    }
}

/// Result of polling the workflow runs of a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowReport {
    pub repository: String,
    /// One status per run, newest first
    pub statuses: Vec<WorkflowStatus>,
    pub tally: Tally,
}

/// Polls `/actions/runs` of one repository
#[derive(Debug, Clone)]
pub struct WorkflowRunMonitor {
    api: GitHubApi,
    run_limit: u32,
}

impl WorkflowRunMonitor {
    /// Create a monitor looking at the `run_limit` most recent runs
    pub fn new(api: GitHubApi, run_limit: u32) -> Self {
        Self { api, run_limit }
    }

    /// Fetch and classify the most recent runs of `repo`
    pub async fn poll(&self, repo: &str) -> Result<WorkflowReport, FetchError> {
        let url = self.api.url(&format!(
            "/repos/{}/actions/runs?per_page={}&sort=created&direction=desc",
            repo, self.run_limit
        ));
        let page: WorkflowRunsPage = self.api.fetch_as(&url).await?;

        let mut statuses = Vec::with_capacity(page.workflow_runs.len());
        let mut tally = Tally::default();

        for run in &page.workflow_runs {
            let status = WorkflowStatus::classify_opt(run.status.as_deref());
            info!(
                "=> {} {} {}",
                run.name.as_deref().unwrap_or("<unnamed>"),
                run.status.as_deref().unwrap_or("null"),
                run.conclusion.as_deref().unwrap_or("null")
            );

            match status {
                WorkflowStatus::InProgress => tally.in_progress += 1,
                WorkflowStatus::Queued => tally.queued += 1,
                WorkflowStatus::Completed | WorkflowStatus::Unknown => {}
            }
            statuses.push(status);
        }

        info!(
            "Repository {} - in_progress: {}, queued: {}",
            repo, tally.in_progress, tally.queued
        );
        if tally.is_busy() {
            info!("There are running or queued GitHub Actions runs.");
        } else {
            info!("No running or queued GitHub Actions runs found.");
        }

        Ok(WorkflowReport {
            repository: repo.to_string(),
            statuses,
            tally,
        })
    }
}
