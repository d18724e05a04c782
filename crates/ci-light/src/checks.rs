//! Check runs of a pull request head commit

use crate::status::CheckStatus;
use ci_light_client::{CheckRunItem, CheckRunsPage, FetchError, GitHubApi};
use log::{info, warn};

/// Outcome of evaluating the check runs of one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckVerdict {
    /// Classified status of every check run, in API order
    pub check_statuses: Vec<CheckStatus>,
    /// Every check run concluded with "success"
    pub merge_ready: bool,
    /// At least one check run exists
    pub has_checks: bool,
}

impl CheckVerdict {
    /// Status of the commit as a whole
    pub fn status(&self) -> CheckStatus {
        CheckStatus::reduce(&self.check_statuses)
    }
}

/// Check runs requested per page
const CHECK_RUNS_PER_PAGE: u32 = 100;

/// Upper bound on check run pages fetched for one commit
const MAX_CHECK_RUN_PAGES: u32 = 10;

/// Fetches and evaluates the check runs of pull request head commits
#[derive(Debug, Clone)]
pub struct CheckRunEvaluator {
    api: GitHubApi,
}

impl CheckRunEvaluator {
    pub fn new(api: GitHubApi) -> Self {
        Self { api }
    }

    /// Every check run of `head_sha`, paging until `total_count` is reached
    ///
    /// The returned flag is false when fewer runs than `total_count` could
    /// be read.
    async fn fetch_check_runs(
        &self,
        repo: &str,
        head_sha: &str,
    ) -> Result<(Vec<CheckRunItem>, bool), FetchError> {
        let base_url = self
            .api
            .url(&format!("/repos/{}/commits/{}/check-runs", repo, head_sha));

        let mut runs = Vec::new();
        let mut total_count = 0;

        for page in 1..=MAX_CHECK_RUN_PAGES {
            let url = format!("{}?per_page={}&page={}", base_url, CHECK_RUNS_PER_PAGE, page);
            let fetched: CheckRunsPage = self.api.fetch_as(&url).await?;
            total_count = fetched.total_count;

            if fetched.check_runs.is_empty() {
                break;
            }
            runs.extend(fetched.check_runs);
            if runs.len() as u64 >= total_count {
                break;
            }
        }

        let complete = runs.len() as u64 >= total_count;
        if !complete {
            warn!(
                "Read {} of {} check runs for {} in {}",
                runs.len(),
                total_count,
                head_sha,
                repo
            );
        }
        Ok((runs, complete))
    }

    /// Evaluate the checks of `head_sha` in `repo`
    ///
    /// Classification uses each check's `status`; merge readiness uses its
    /// `conclusion`. A completed check that failed therefore counts as
    /// completed while still blocking the merge. Check runs that could not
    /// be read block the merge as well.
    pub async fn evaluate(
        &self,
        repo: &str,
        head_sha: &str,
        pr_number: u64,
        pr_title: &str,
    ) -> Result<CheckVerdict, FetchError> {
        let (runs, complete) = self.fetch_check_runs(repo, head_sha).await?;

        if runs.is_empty() {
            info!("PR #{} ({}): cannot merge - no check runs", pr_number, repo);
            return Ok(CheckVerdict {
                check_statuses: Vec::new(),
                merge_ready: false,
                has_checks: false,
            });
        }

        let mut check_statuses = Vec::with_capacity(runs.len());
        let mut merge_ready = complete;

        for run in &runs {
            let status = CheckStatus::classify_opt(run.status.as_deref());
            info!(
                "PR #{} ({}) ({}) - {}: [{}] {}",
                pr_number,
                repo,
                pr_title,
                run.name.as_deref().unwrap_or_default(),
                run.status.as_deref().unwrap_or("null"),
                run.conclusion.as_deref().unwrap_or("none")
            );

            check_statuses.push(status);
            merge_ready &= run
                .conclusion
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case("success"));
        }

        let verdict = CheckVerdict {
            check_statuses,
            merge_ready,
            has_checks: true,
        };

        if verdict.merge_ready {
            info!(
                "PR #{} ({}): all {} checks passed - ready to merge",
                pr_number,
                repo,
                verdict.check_statuses.len()
            );
        } else {
            info!(
                "PR #{} ({}): {} - cannot merge",
                pr_number,
                repo,
                verdict.status()
            );
        }

        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ci_light_client::FakeTransport;
    use std::sync::Arc;

    const URL: &str =
        "https://api.github.com/repos/a/b/commits/abc123/check-runs?per_page=100&page=1";

    fn page_url(page: u32) -> String {
        format!(
            "https://api.github.com/repos/a/b/commits/abc123/check-runs?per_page=100&page={page}"
        )
    }

    fn evaluator(fake: &FakeTransport) -> CheckRunEvaluator {
        CheckRunEvaluator::new(GitHubApi::new(
            Arc::new(fake.clone()),
            "https://api.github.com",
            "t",
        ))
    }

    fn checks(runs: &[(&str, &str, Option<&str>)]) -> String {
        let runs: Vec<serde_json::Value> = runs
            .iter()
            .map(|(name, status, conclusion)| {
                serde_json::json!({ "name": name, "status": status, "conclusion": conclusion })
            })
            .collect();
        serde_json::json!({ "total_count": runs.len(), "check_runs": runs }).to_string()
    }

    #[tokio::test]
    async fn test_no_check_runs_cannot_merge() {
        let fake = FakeTransport::new();
        fake.ok_json(URL, checks(&[]));

        let verdict = evaluator(&fake).evaluate("a/b", "abc123", 5, "t").await.unwrap();

        assert!(!verdict.has_checks);
        assert!(!verdict.merge_ready);
        assert!(verdict.check_statuses.is_empty());
        assert_eq!(verdict.status(), CheckStatus::Unknown);
    }

    #[tokio::test]
    async fn test_all_successful_checks_are_merge_ready() {
        let fake = FakeTransport::new();
        fake.ok_json(
            URL,
            checks(&[
                ("build", "completed", Some("success")),
                ("test", "completed", Some("SUCCESS")),
            ]),
        );

        let verdict = evaluator(&fake).evaluate("a/b", "abc123", 5, "t").await.unwrap();

        assert!(verdict.has_checks);
        assert!(verdict.merge_ready);
        assert_eq!(
            verdict.check_statuses,
            vec![CheckStatus::Completed, CheckStatus::Completed]
        );
        assert_eq!(verdict.status(), CheckStatus::Completed);
    }

    #[tokio::test]
    async fn test_failed_conclusion_blocks_merge_but_stays_completed() {
        let fake = FakeTransport::new();
        fake.ok_json(
            URL,
            checks(&[
                ("build", "completed", Some("success")),
                ("lint", "completed", Some("failure")),
            ]),
        );

        let verdict = evaluator(&fake).evaluate("a/b", "abc123", 5, "t").await.unwrap();

        assert!(!verdict.merge_ready);
        assert_eq!(verdict.status(), CheckStatus::Completed);
    }

    #[tokio::test]
    async fn test_running_check_has_no_conclusion() {
        let fake = FakeTransport::new();
        fake.ok_json(
            URL,
            checks(&[
                ("build", "completed", Some("success")),
                ("test", "in_progress", None),
            ]),
        );

        let verdict = evaluator(&fake).evaluate("a/b", "abc123", 5, "t").await.unwrap();

        assert!(!verdict.merge_ready);
        assert_eq!(verdict.status(), CheckStatus::InProgress);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_returned() {
        let fake = FakeTransport::new();
        fake.status(URL, 404);

        let err = evaluator(&fake)
            .evaluate("a/b", "abc123", 5, "t")
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::UnexpectedStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_null_status_is_classified_not_rejected() {
        let fake = FakeTransport::new();
        fake.ok_json(
            URL,
            r#"{
                "total_count": 2,
                "check_runs": [
                    { "name": "build", "status": "in_progress", "conclusion": null },
                    { "name": null, "status": null, "conclusion": null }
                ]
            }"#,
        );

        let verdict = evaluator(&fake).evaluate("a/b", "abc123", 5, "t").await.unwrap();

        assert!(verdict.has_checks);
        assert_eq!(
            verdict.check_statuses,
            vec![CheckStatus::InProgress, CheckStatus::Unknown]
        );
        assert_eq!(verdict.status(), CheckStatus::InProgress);
    }

    #[tokio::test]
    async fn test_check_runs_beyond_first_page_are_evaluated() {
        let fake = FakeTransport::new();
        let passing: Vec<serde_json::Value> = (0..100)
            .map(|i| {
                serde_json::json!({
                    "name": format!("c{i}"),
                    "status": "completed",
                    "conclusion": "success"
                })
            })
            .collect();
        fake.ok_json(
            page_url(1),
            serde_json::json!({ "total_count": 101, "check_runs": passing }).to_string(),
        );
        fake.ok_json(
            page_url(2),
            serde_json::json!({
                "total_count": 101,
                "check_runs": [{ "name": "late", "status": "completed", "conclusion": "failure" }]
            })
            .to_string(),
        );

        let verdict = evaluator(&fake).evaluate("a/b", "abc123", 5, "t").await.unwrap();

        assert_eq!(verdict.check_statuses.len(), 101);
        assert!(!verdict.merge_ready);
        assert_eq!(fake.urls(), vec![page_url(1), page_url(2)]);
    }

    #[tokio::test]
    async fn test_unreadable_check_runs_block_merge() {
        let fake = FakeTransport::new();
        // total_count promises more runs than the listing delivers
        fake.ok_json(
            page_url(1),
            serde_json::json!({
                "total_count": 3,
                "check_runs": [{ "name": "build", "status": "completed", "conclusion": "success" }]
            })
            .to_string(),
        );
        fake.ok_json(page_url(2), r#"{ "total_count": 3, "check_runs": [] }"#);

        let verdict = evaluator(&fake).evaluate("a/b", "abc123", 5, "t").await.unwrap();

        assert!(verdict.has_checks);
        assert!(!verdict.merge_ready);
        assert_eq!(verdict.status(), CheckStatus::Completed);
    }
}
