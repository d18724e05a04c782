//! Open pull requests of one repository

use crate::checks::{CheckRunEvaluator, CheckVerdict};
use crate::fanout::ordered_fan_out;
use crate::status::CheckStatus;
use ci_light_client::{FetchError, GitHubApi, PullRequestItem};
use log::{debug, warn};
use serde_json::Value;

/// CI state of one open pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestSummary {
    /// "owner/name" of the repository
    pub repository: String,
    pub number: u64,
    pub title: String,
    pub head_sha: String,
    /// Status shown on the ribbon for this pull request
    pub status: CheckStatus,
    pub merge_ready: bool,
    pub has_checks: bool,
    pub check_statuses: Vec<CheckStatus>,
}

impl PullRequestSummary {
    fn from_verdict(repository: &str, pr: &PullRequestItem, verdict: CheckVerdict) -> Self {
        Self {
            repository: repository.to_string(),
            number: pr.number,
            title: pr.title.clone(),
            head_sha: pr.head.sha.clone(),
            status: verdict.status(),
            merge_ready: verdict.merge_ready,
            has_checks: verdict.has_checks,
            check_statuses: verdict.check_statuses,
        }
    }

    /// Summary for a pull request whose checks could not be fetched
    fn unavailable(repository: &str, pr: &PullRequestItem) -> Self {
        Self {
            repository: repository.to_string(),
            number: pr.number,
            title: pr.title.clone(),
            head_sha: pr.head.sha.clone(),
            status: CheckStatus::Unknown,
            merge_ready: false,
            has_checks: false,
            check_statuses: Vec::new(),
        }
    }
}

/// Scans the open pull requests of a repository
#[derive(Debug, Clone)]
pub struct PullRequestScanner {
    api: GitHubApi,
    evaluator: CheckRunEvaluator,
    concurrency: usize,
}

impl PullRequestScanner {
    /// Create a scanner evaluating up to `concurrency` pull requests at once
    pub fn new(api: GitHubApi, concurrency: usize) -> Self {
        Self {
            evaluator: CheckRunEvaluator::new(api.clone()),
            api,
            concurrency,
        }
    }

    /// Open pull requests of `repo`, newest first
    ///
    /// An empty list is a normal result. Items that do not look like a pull
    /// request are skipped.
    pub async fn list_open(&self, repo: &str) -> Result<Vec<PullRequestItem>, FetchError> {
        let url = self.api.url(&format!(
            "/repos/{}/pulls?state=open&sort=created&direction=desc",
            repo
        ));

        let listing = self.api.fetch_json(&url).await?;
        let entries = match listing {
            Value::Array(entries) => entries,
            _ => return Err(FetchError::malformed(url, "expected a list of pull requests")),
        };

        let prs = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<PullRequestItem>(entry) {
                Ok(pr) if pr.number > 0 => Some(pr),
                Ok(pr) => {
                    warn!("Skipping pull request with number {} in {}", pr.number, repo);
                    None
                }
                Err(e) => {
                    warn!("Skipping malformed pull request in {}: {}", repo, e);
                    None
                }
            })
            .collect();

        Ok(prs)
    }

    /// Summaries of all open pull requests of `repo`, in API order
    ///
    /// Fails only if the pull request listing itself fails. A failure to
    /// fetch the checks of one pull request degrades that pull request to
    /// `Unknown`.
    pub async fn try_scan(&self, repo: &str) -> Result<Vec<PullRequestSummary>, FetchError> {
        let prs = self.list_open(repo).await?;
        debug!("{} open pull requests in {}", prs.len(), repo);

        let evaluator = self.evaluator.clone();
        let repository = repo.to_string();
        let slots = ordered_fan_out(prs.clone(), self.concurrency, move |pr| {
            let evaluator = evaluator.clone();
            let repository = repository.clone();
            async move {
                evaluator
                    .evaluate(&repository, &pr.head.sha, pr.number, &pr.title)
                    .await
            }
        })
        .await;

        let summaries = prs
            .iter()
            .zip(slots)
            .map(|(pr, slot)| match slot {
                Some(Ok(verdict)) => PullRequestSummary::from_verdict(repo, pr, verdict),
                Some(Err(e)) => {
                    warn!("Failed to fetch check runs for PR #{} ({}): {}", pr.number, repo, e);
                    PullRequestSummary::unavailable(repo, pr)
                }
                None => PullRequestSummary::unavailable(repo, pr),
            })
            .collect();

        Ok(summaries)
    }

    /// Like [`PullRequestScanner::try_scan`], degrading a failure to `[]`
    pub async fn scan(&self, repo: &str) -> Vec<PullRequestSummary> {
        match self.try_scan(repo).await {
            Ok(summaries) => summaries,
            Err(e) => {
                warn!("Failed to fetch pull requests for {}: {}", repo, e);
                Vec::new()
            }
        }
    }

    /// One status per open pull request of `repo`, in API order
    pub async fn statuses(&self, repo: &str) -> Vec<CheckStatus> {
        self.scan(repo).await.into_iter().map(|s| s.status).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ci_light_client::FakeTransport;
    use std::sync::Arc;
    use std::time::Duration;

    const PULLS: &str =
        "https://api.github.com/repos/a/b/pulls?state=open&sort=created&direction=desc";

    fn checks_url(sha: &str) -> String {
        format!(
            "https://api.github.com/repos/a/b/commits/{sha}/check-runs?per_page=100&page=1"
        )
    }

    fn scanner(fake: &FakeTransport, concurrency: usize) -> PullRequestScanner {
        let api = GitHubApi::new(Arc::new(fake.clone()), "https://api.github.com", "t");
        PullRequestScanner::new(api, concurrency)
    }

    fn pr(number: u64, sha: &str) -> Value {
        serde_json::json!({ "number": number, "title": format!("PR {number}"), "head": { "sha": sha } })
    }

    fn check(status: &str, conclusion: Option<&str>) -> String {
        serde_json::json!({
            "total_count": 1,
            "check_runs": [{ "name": "ci", "status": status, "conclusion": conclusion }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_no_open_pull_requests() {
        let fake = FakeTransport::new();
        fake.ok_json(PULLS, "[]");

        let result = scanner(&fake, 1).try_scan("a/b").await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_listing_failure_degrades_to_empty() {
        let fake = FakeTransport::new();
        fake.status(PULLS, 500);

        let scanner = scanner(&fake, 1);

        assert!(scanner.try_scan("a/b").await.is_err());
        assert!(scanner.scan("a/b").await.is_empty());
    }

    #[tokio::test]
    async fn test_order_follows_api_order_under_concurrency() {
        let fake = FakeTransport::new();
        fake.ok_json(PULLS, Value::Array(vec![pr(9, "s9"), pr(7, "s7"), pr(3, "s3")]).to_string());
        fake.ok_json(checks_url("s9"), check("in_progress", None));
        fake.ok_json(checks_url("s7"), check("completed", Some("success")));
        fake.ok_json(checks_url("s3"), check("queued", None));
        // the first PR answers last
        fake.delay(checks_url("s9"), Duration::from_millis(30));

        let result = scanner(&fake, 3).try_scan("a/b").await.unwrap();

        let numbers: Vec<u64> = result.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![9, 7, 3]);
        let statuses: Vec<CheckStatus> = result.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![CheckStatus::InProgress, CheckStatus::Completed, CheckStatus::Unknown]
        );
        assert!(result[1].merge_ready);
    }

    #[tokio::test]
    async fn test_check_failure_degrades_single_pull_request() {
        let fake = FakeTransport::new();
        fake.ok_json(PULLS, Value::Array(vec![pr(2, "bad"), pr(1, "good")]).to_string());
        fake.status(checks_url("bad"), 502);
        fake.ok_json(checks_url("good"), check("completed", Some("success")));

        let result = scanner(&fake, 1).try_scan("a/b").await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].status, CheckStatus::Unknown);
        assert!(!result[0].merge_ready);
        assert_eq!(result[1].status, CheckStatus::Completed);
        assert!(result[1].merge_ready);
    }

    #[tokio::test]
    async fn test_malformed_items_are_skipped() {
        let fake = FakeTransport::new();
        let listing = serde_json::json!([
            { "number": 4, "title": "no head" },
            pr(0, "zero"),
            pr(1, "ok"),
        ]);
        fake.ok_json(PULLS, listing.to_string());
        fake.ok_json(checks_url("ok"), check("completed", Some("success")));

        let statuses = scanner(&fake, 2).statuses("a/b").await;

        assert_eq!(statuses, vec![CheckStatus::Completed]);
    }
}
