//! Autoreview: CI-gated pull request review agent.
//!
//! Runs inside a workflow job triggered by a pull request event, inspects
//! the check-runs attached to the pull request's latest commit, classifies
//! their aggregate state into a three-way decision (waiting, blocked,
//! approved), and posts the matching review: approve, request changes, or
//! an informational comment.

pub mod agent;
pub mod checks;
pub mod event;
pub mod github;
pub mod review;

pub use agent::{AgentConfig, Outcome, run_review_agent};
pub use checks::{CheckConclusion, CheckRun, CheckStatus, Decision, evaluate_checks};
pub use event::PullRequestEvent;
pub use github::{Forge, GitHubForge, Repo, setup_github_client};
pub use review::{Review, ReviewEvent, review_for_decision};
