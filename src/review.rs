//! Mapping decisions to pull request reviews.

use serde::Serialize;

use crate::checks::Decision;

/// Review event type accepted by the reviews API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewEvent {
    Approve,
    RequestChanges,
    Comment,
}

impl ReviewEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewEvent::Approve => "APPROVE",
            ReviewEvent::RequestChanges => "REQUEST_CHANGES",
            ReviewEvent::Comment => "COMMENT",
        }
    }
}

/// A review ready to be posted on a pull request.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub event: ReviewEvent,
    pub body: String,
}

const SELF_APPROVAL_BODY: &str = "✅ **All CI checks passed**\n\n\
    🤖 **AI Agent Review Result:** Approved\n\n\
    ℹ️ *PR author and reviewer are the same. \
    GitHub does not allow self-approval, so a comment is added instead.*\n\n\
    🚀 **This PR is safe to merge.**";

const APPROVAL_BODY: &str = "✅ All CI checks passed. PR approved by AI Agent.";

const BLOCKED_BODY: &str = "❌ CI checks failed. Please address the issues and update the PR.";

const WAITING_BODY: &str = "⏳ CI checks are still running. PR under review.";

/// Builds the review a decision calls for.
///
/// The platform rejects reviews that approve one's own pull request, so
/// when the author is also the actor who triggered the run an approval
/// becomes an explanatory comment instead.
pub fn review_for_decision(decision: Decision, author: &str, actor: &str) -> Review {
    match decision {
        Decision::Approved if author == actor => Review {
            event: ReviewEvent::Comment,
            body: SELF_APPROVAL_BODY.to_string(),
        },
        Decision::Approved => Review {
            event: ReviewEvent::Approve,
            body: APPROVAL_BODY.to_string(),
        },
        Decision::Blocked => Review {
            event: ReviewEvent::RequestChanges,
            body: BLOCKED_BODY.to_string(),
        },
        Decision::Waiting => Review {
            event: ReviewEvent::Comment,
            body: WAITING_BODY.to_string(),
        },
    }
}
