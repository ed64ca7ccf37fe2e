//! GitHub access: authentication, repository naming, and the forge seam.
//!
//! The agent only needs three remote operations, so they live behind the
//! [`Forge`] trait and the decision pipeline never touches octocrab
//! directly. Responses are deserialized into our own serde types via
//! octocrab's generic `get`/`post`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

use crate::{
    checks::CheckRun,
    review::{Review, ReviewEvent},
};

// GitHub caps check-runs at 100 per page; the cap on pages guards against
// a runaway pagination loop.
const CHECK_RUNS_PER_PAGE: u8 = 100;
const MAX_CHECK_RUN_PAGES: u32 = 20;

/// A repository identified by its qualified `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    pub owner: String,
    pub name: String,
}

impl Repo {
    /// Parses a qualified repository name such as `acme/widgets`.
    pub fn parse(full_name: &str) -> Result<Self> {
        match full_name.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => anyhow::bail!(
                "Repository must be in format 'owner/repo', got: '{}'",
                full_name
            ),
        }
    }
}

impl std::fmt::Display for Repo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

pub fn get_github_token() -> Result<String> {
    if let Ok(token) = std::env::var("GITHUB_TOKEN") {
        return Ok(token);
    }

    if let Ok(token) = std::env::var("GH_TOKEN") {
        return Ok(token);
    }

    anyhow::bail!("GITHUB_TOKEN is not set")
}

/// Creates an authenticated GitHub client using available credentials.
pub fn setup_github_client() -> Result<Octocrab> {
    let token = get_github_token().context("Failed to obtain GitHub authentication token")?;
    Octocrab::builder()
        .personal_token(token)
        .build()
        .context("Failed to create GitHub client")
}

/// The remote operations the review agent performs against a forge.
#[async_trait]
pub trait Forge {
    /// Resolves the sha of the latest commit on a pull request.
    async fn latest_commit_sha(&self, repo: &Repo, pr_number: u64) -> Result<String>;

    /// Lists all check-runs reported against a commit.
    async fn list_check_runs(&self, repo: &Repo, sha: &str) -> Result<Vec<CheckRun>>;

    /// Posts a review on a pull request.
    async fn post_review(&self, repo: &Repo, pr_number: u64, review: &Review) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct PullRequestResponse {
    head: CommitRef,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct CheckRunsPage {
    total_count: u64,
    check_runs: Vec<CheckRun>,
}

#[derive(Debug, Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

#[derive(Debug, Serialize)]
struct CreateReviewRequest<'a> {
    body: &'a str,
    event: ReviewEvent,
}

#[derive(Debug, Deserialize)]
struct ReviewResponse {
    id: u64,
}

/// [`Forge`] implementation backed by the GitHub REST API.
pub struct GitHubForge {
    octocrab: Octocrab,
}

impl GitHubForge {
    pub fn new(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }
}

#[async_trait]
impl Forge for GitHubForge {
    async fn latest_commit_sha(&self, repo: &Repo, pr_number: u64) -> Result<String> {
        // The head sha of the pull request is its most recent commit,
        // which avoids paging through the commit list.
        let pr: PullRequestResponse = self
            .octocrab
            .get(
                format!("/repos/{}/{}/pulls/{}", repo.owner, repo.name, pr_number),
                None::<&()>,
            )
            .await
            .with_context(|| format!("Failed to fetch PR #{} from {}", pr_number, repo))?;

        Ok(pr.head.sha)
    }

    async fn list_check_runs(&self, repo: &Repo, sha: &str) -> Result<Vec<CheckRun>> {
        let route = format!(
            "/repos/{}/{}/commits/{}/check-runs",
            repo.owner, repo.name, sha
        );

        let mut check_runs = Vec::new();
        let mut page = 1;

        loop {
            let response: CheckRunsPage = self
                .octocrab
                .get(
                    &route,
                    Some(&PageParams {
                        per_page: CHECK_RUNS_PER_PAGE,
                        page,
                    }),
                )
                .await
                .with_context(|| format!("Failed to list check runs for commit {}", sha))?;

            let total_count = response.total_count;
            check_runs.extend(response.check_runs);

            if check_runs.len() as u64 >= total_count || page >= MAX_CHECK_RUN_PAGES {
                break;
            }
            page += 1;
        }

        Ok(check_runs)
    }

    async fn post_review(&self, repo: &Repo, pr_number: u64, review: &Review) -> Result<()> {
        let review: ReviewResponse = self
            .octocrab
            .post(
                format!(
                    "/repos/{}/{}/pulls/{}/reviews",
                    repo.owner, repo.name, pr_number
                ),
                Some(&CreateReviewRequest {
                    body: &review.body,
                    event: review.event,
                }),
            )
            .await
            .with_context(|| format!("Failed to post review on PR #{} in {}", pr_number, repo))?;

        tracing::debug!(review_id = review.id, "review created");
        Ok(())
    }
}
