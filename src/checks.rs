//! Check-run evaluation.
//!
//! Folds the check-runs attached to a commit into a three-way decision.
//! The agent's own check-run is excluded so the agent never blocks on the
//! workflow job it is running inside.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Execution status reported for a check-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Queued,
    InProgress,
    Completed,
    Waiting,
    Requested,
    Pending,
    #[serde(other)]
    Unknown,
}

/// Conclusion reported for a completed check-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    Success,
    Failure,
    Cancelled,
    TimedOut,
    Neutral,
    Skipped,
    ActionRequired,
    Stale,
    #[serde(other)]
    Unknown,
}

impl CheckConclusion {
    /// A conclusion that disqualifies the pull request from approval.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            CheckConclusion::Failure | CheckConclusion::Cancelled | CheckConclusion::TimedOut
        )
    }
}

/// A single CI check reported against a commit.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRun {
    pub name: String,
    pub status: CheckStatus,
    pub conclusion: Option<CheckConclusion>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl CheckRun {
    pub fn is_completed(&self) -> bool {
        self.status == CheckStatus::Completed
    }
}

/// Aggregate classification of a pull request's check-runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Checks are absent or still running.
    Waiting,
    /// At least one check failed, was cancelled, or timed out.
    Blocked,
    /// Every check (other than the agent's own) completed successfully.
    Approved,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Waiting => write!(f, "waiting"),
            Decision::Blocked => write!(f, "blocked"),
            Decision::Approved => write!(f, "approved"),
        }
    }
}

/// Folds a commit's check-runs into a [`Decision`].
///
/// The check-run named `own_check_name` is always excluded from the fold.
/// A blocking conclusion on any other run dominates, regardless of entry
/// order; otherwise any incomplete run keeps the pull request waiting.
/// With no check-runs at all there is nothing to judge yet, so the result
/// is also waiting.
pub fn evaluate_checks(check_runs: &[CheckRun], own_check_name: &str) -> Decision {
    if check_runs.is_empty() {
        return Decision::Waiting;
    }

    let mut pending = false;

    for run in check_runs.iter().filter(|run| run.name != own_check_name) {
        if !run.is_completed() {
            pending = true;
            continue;
        }

        if run.conclusion.is_some_and(|c| c.is_blocking()) {
            return Decision::Blocked;
        }
    }

    if pending {
        Decision::Waiting
    } else {
        Decision::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGENT: &str = "AI PR Review Agent";

    fn completed(name: &str, conclusion: CheckConclusion) -> CheckRun {
        CheckRun {
            name: name.to_string(),
            status: CheckStatus::Completed,
            conclusion: Some(conclusion),
            started_at: None,
            completed_at: None,
        }
    }

    fn running(name: &str) -> CheckRun {
        CheckRun {
            name: name.to_string(),
            status: CheckStatus::InProgress,
            conclusion: None,
            started_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn no_checks_means_waiting() {
        assert_eq!(evaluate_checks(&[], AGENT), Decision::Waiting);
    }

    #[test]
    fn all_green_means_approved() {
        let runs = vec![
            completed("build", CheckConclusion::Success),
            completed("test", CheckConclusion::Success),
        ];
        assert_eq!(evaluate_checks(&runs, AGENT), Decision::Approved);
    }

    #[test]
    fn incomplete_check_means_waiting() {
        let runs = vec![completed("build", CheckConclusion::Success), running("test")];
        assert_eq!(evaluate_checks(&runs, AGENT), Decision::Waiting);
    }

    #[test]
    fn failure_means_blocked() {
        let runs = vec![
            completed("build", CheckConclusion::Success),
            completed("test", CheckConclusion::Failure),
        ];
        assert_eq!(evaluate_checks(&runs, AGENT), Decision::Blocked);
    }

    #[test]
    fn cancelled_and_timed_out_block() {
        for conclusion in [CheckConclusion::Cancelled, CheckConclusion::TimedOut] {
            let runs = vec![completed("test", conclusion)];
            assert_eq!(evaluate_checks(&runs, AGENT), Decision::Blocked);
        }
    }

    #[test]
    fn failure_dominates_pending_checks_regardless_of_order() {
        let runs = vec![running("lint"), completed("test", CheckConclusion::Failure)];
        assert_eq!(evaluate_checks(&runs, AGENT), Decision::Blocked);

        let runs: Vec<CheckRun> = runs.into_iter().rev().collect();
        assert_eq!(evaluate_checks(&runs, AGENT), Decision::Blocked);
    }

    #[test]
    fn own_check_is_excluded() {
        // The agent's own job is still in progress while it evaluates,
        // which must not keep the decision stuck at waiting.
        let runs = vec![running(AGENT), completed("build", CheckConclusion::Success)];
        assert_eq!(evaluate_checks(&runs, AGENT), Decision::Approved);

        let runs = vec![completed(AGENT, CheckConclusion::Failure)];
        assert_eq!(evaluate_checks(&runs, AGENT), Decision::Approved);
    }

    #[test]
    fn neutral_and_skipped_do_not_block() {
        let runs = vec![
            completed("optional-scan", CheckConclusion::Neutral),
            completed("docs", CheckConclusion::Skipped),
            completed("build", CheckConclusion::Success),
        ];
        assert_eq!(evaluate_checks(&runs, AGENT), Decision::Approved);
    }

    #[test]
    fn unknown_status_counts_as_incomplete() {
        let runs = vec![CheckRun {
            name: "exotic".to_string(),
            status: CheckStatus::Unknown,
            conclusion: None,
            started_at: None,
            completed_at: None,
        }];
        assert_eq!(evaluate_checks(&runs, AGENT), Decision::Waiting);
    }

    #[test]
    fn deserializes_github_wire_format() {
        let run: CheckRun = serde_json::from_value(serde_json::json!({
            "name": "unit-tests",
            "status": "completed",
            "conclusion": "timed_out",
            "started_at": "2024-05-01T12:00:00Z",
            "completed_at": "2024-05-01T12:30:00Z"
        }))
        .unwrap();

        assert_eq!(run.status, CheckStatus::Completed);
        assert_eq!(run.conclusion, Some(CheckConclusion::TimedOut));
        assert!(run.started_at.is_some());
    }

    #[test]
    fn tolerates_unrecognised_conclusion() {
        let run: CheckRun = serde_json::from_value(serde_json::json!({
            "name": "unit-tests",
            "status": "completed",
            "conclusion": "some_future_value"
        }))
        .unwrap();

        assert_eq!(run.conclusion, Some(CheckConclusion::Unknown));
        let decision = evaluate_checks(&[run], AGENT);
        assert_eq!(decision, Decision::Approved);
    }
}
