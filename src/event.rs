//! Workflow event payload handling.
//!
//! A workflow runner hands us the triggering event as a JSON file (the path
//! arrives via `GITHUB_EVENT_PATH`). Only pull request events carry enough
//! context to review anything; everything else is rejected up front.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::github::Repo;

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    pull_request: Option<RawPullRequest>,
    repository: RawRepository,
    sender: RawUser,
}

#[derive(Debug, Deserialize)]
struct RawPullRequest {
    number: u64,
    user: RawUser,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    login: String,
}

/// The pull request context extracted from a workflow event payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestEvent {
    pub repo: Repo,
    pub pr_number: u64,
    /// Login of the user who opened the pull request.
    pub author: String,
    /// Login of the actor whose activity triggered this workflow run.
    pub actor: String,
}

impl PullRequestEvent {
    /// Parses a raw event payload, rejecting events that are not pull
    /// request triggers.
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        let event: RawEvent =
            serde_json::from_slice(payload).context("Failed to parse workflow event payload")?;

        let pull_request = event
            .pull_request
            .context("Workflow was not triggered by a pull request")?;

        let repo = Repo::parse(&event.repository.full_name)?;

        Ok(Self {
            repo,
            pr_number: pull_request.number,
            author: pull_request.user.login,
            actor: event.sender.login,
        })
    }

    /// Reads and parses the event file a workflow runner points us at.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let payload = std::fs::read(path)
            .with_context(|| format!("Failed to read event file: '{}'", path.display()))?;
        Self::from_payload(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pull_request_payload() -> serde_json::Value {
        serde_json::json!({
            "action": "synchronize",
            "pull_request": {
                "number": 42,
                "user": { "login": "alice" }
            },
            "repository": { "full_name": "acme/widgets" },
            "sender": { "login": "bob" }
        })
    }

    #[test]
    fn parses_pull_request_event() {
        let payload = serde_json::to_vec(&pull_request_payload()).unwrap();
        let event = PullRequestEvent::from_payload(&payload).unwrap();

        assert_eq!(event.repo.owner, "acme");
        assert_eq!(event.repo.name, "widgets");
        assert_eq!(event.pr_number, 42);
        assert_eq!(event.author, "alice");
        assert_eq!(event.actor, "bob");
    }

    #[test]
    fn rejects_non_pull_request_event() {
        let mut payload = pull_request_payload();
        payload.as_object_mut().unwrap().remove("pull_request");
        let payload = serde_json::to_vec(&payload).unwrap();

        let err = PullRequestEvent::from_payload(&payload).unwrap_err();
        assert!(
            err.to_string().contains("not triggered by a pull request"),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn rejects_malformed_payload() {
        assert!(PullRequestEvent::from_payload(b"not json").is_err());
    }

    #[test]
    fn rejects_missing_event_file() {
        assert!(PullRequestEvent::from_file("/nonexistent/event.json").is_err());
    }
}
