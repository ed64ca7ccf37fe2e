//! The read-evaluate-act cycle.
//!
//! Each invocation is stateless: fetch the latest commit's check-runs,
//! fold them into a decision, post the matching review. The only side
//! effect is the posted review.

use anyhow::Result;
use tracing::{debug, info};

use crate::{
    checks::{Decision, evaluate_checks},
    event::PullRequestEvent,
    github::Forge,
    review::{Review, review_for_decision},
};

/// Default name of the workflow check-run this agent executes inside of.
pub const DEFAULT_AGENT_CHECK_NAME: &str = "AI PR Review Agent";

#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Name of the agent's own check-run, excluded from evaluation.
    pub check_name: String,
    /// Evaluate and report without posting the review.
    pub dry_run: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            check_name: DEFAULT_AGENT_CHECK_NAME.to_string(),
            dry_run: false,
        }
    }
}

/// What a single agent run decided and did.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub decision: Decision,
    pub review: Review,
    /// False when dry-run mode suppressed the review.
    pub posted: bool,
}

/// Runs one review cycle for the pull request described by `event`.
pub async fn run_review_agent<F>(
    forge: &F,
    event: &PullRequestEvent,
    config: &AgentConfig,
) -> Result<Outcome>
where
    F: Forge + Sync,
{
    info!(
        repo = %event.repo,
        pr = event.pr_number,
        "starting review for pull request"
    );

    let sha = forge.latest_commit_sha(&event.repo, event.pr_number).await?;
    debug!(%sha, "resolved latest commit");

    let check_runs = forge.list_check_runs(&event.repo, &sha).await?;

    if check_runs.is_empty() {
        info!("no CI checks found yet");
    }
    for run in &check_runs {
        info!(
            check = %run.name,
            status = ?run.status,
            conclusion = ?run.conclusion,
            "evaluating check"
        );
    }

    let decision = evaluate_checks(&check_runs, &config.check_name);
    info!(%decision, "evaluation complete");

    let review = review_for_decision(decision, &event.author, &event.actor);

    let posted = if config.dry_run {
        info!(event = review.event.as_str(), "dry run, review not posted");
        false
    } else {
        forge
            .post_review(&event.repo, event.pr_number, &review)
            .await?;
        info!(event = review.event.as_str(), "review posted");
        true
    };

    Ok(Outcome {
        decision,
        review,
        posted,
    })
}
