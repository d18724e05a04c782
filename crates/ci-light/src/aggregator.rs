//! Pull request status across all repositories of a user

use crate::fanout::ordered_fan_out;
use crate::pager::{full_name, ResourcePager, StopReason};
use crate::pulls::{PullRequestScanner, PullRequestSummary};
use crate::status::CheckStatus;
use log::{info, warn};

/// Result of one aggregation pass
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateReport {
    /// Repositories found, in enumeration order
    pub repositories: Vec<String>,
    /// Why repository enumeration ended
    pub enumeration: StopReason,
    /// Every open pull request, by repository then by API order
    pub summaries: Vec<PullRequestSummary>,
}

impl AggregateReport {
    /// One status per pull request, in the order of `summaries`
    pub fn statuses(&self) -> Vec<CheckStatus> {
        self.summaries.iter().map(|s| s.status).collect()
    }

    /// Pull requests whose checks all succeeded
    pub fn merge_ready(&self) -> impl Iterator<Item = &PullRequestSummary> {
        self.summaries.iter().filter(|s| s.merge_ready)
    }
}

/// Enumerates a user's repositories and scans each for open pull requests
#[derive(Debug, Clone)]
pub struct RepositoryAggregator {
    pager: ResourcePager,
    scanner: PullRequestScanner,
    concurrency: usize,
}

impl RepositoryAggregator {
    /// Create an aggregator scanning up to `concurrency` repositories at once
    pub fn new(pager: ResourcePager, scanner: PullRequestScanner, concurrency: usize) -> Self {
        Self {
            pager,
            scanner,
            concurrency,
        }
    }

    /// Repositories of `username`, most recently updated first
    pub async fn list_repositories(&self, username: &str) -> (Vec<String>, StopReason) {
        let base_url = self
            .pager
            .api()
            .url(&format!("/users/{}/repos?sort=updated&direction=desc", username));
        let paged = self.pager.fetch_all(&base_url, full_name).await;
        (paged.items, paged.stop)
    }

    /// Run one aggregation pass for `username`
    ///
    /// Never fails: a repository whose pull requests cannot be listed adds
    /// nothing, and a failed enumeration keeps the repositories found so far.
    pub async fn run(&self, username: &str) -> AggregateReport {
        let (repositories, enumeration) = self.list_repositories(username).await;
        info!("Scanning {} repositories of {}", repositories.len(), username);

        let scanner = self.scanner.clone();
        let slots = ordered_fan_out(repositories.clone(), self.concurrency, move |repo| {
            let scanner = scanner.clone();
            async move { scanner.scan(&repo).await }
        })
        .await;

        let mut summaries = Vec::new();
        for (repo, slot) in repositories.iter().zip(slots) {
            match slot {
                Some(found) => summaries.extend(found),
                None => warn!("Scan of {} did not finish", repo),
            }
        }

        let ready = summaries.iter().filter(|s| s.merge_ready).count();
        info!(
            "{} open pull requests across {} repositories, {} ready to merge",
            summaries.len(),
            repositories.len(),
            ready
        );

        AggregateReport {
            repositories,
            enumeration,
            summaries,
        }
    }
}
