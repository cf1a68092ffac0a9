//! Apply-outcome bookkeeping.
//!
//! The core never performs network I/O; an external apply step executes the
//! plan and records each outcome here. A failed operation is recorded and
//! the batch continues — endpoints are independent, and idempotent
//! replanning converges on the next run.

use serde::{Deserialize, Serialize};

use crate::error::ApplyError;
use crate::logging::RunContext;

use super::plan::PlannedOp;

/// One operation that failed to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyFailure {
    pub op: String,
    pub error: String,
}

/// Per-run record of what the apply step did with the plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<ApplyFailure>,
}

impl ApplyReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully applied operation.
    pub fn record_applied(&mut self, op: &PlannedOp) {
        self.applied.push(op.action.describe());
    }

    /// Record an operation held back (deletion safety, cap, inapplicable).
    pub fn record_skipped(&mut self, op: &PlannedOp) {
        self.skipped.push(op.action.describe());
    }

    /// Record a failed operation; the apply step moves on to the next one.
    pub fn record_failed(&mut self, op: &PlannedOp, error: ApplyError) {
        let described = op.action.describe();
        log::error!("APPLY_FAILED op={} error={}", described, error);
        self.failed.push(ApplyFailure {
            op: described,
            error: error.to_string(),
        });
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// One-line summary for the end of a run.
    pub fn log_summary(&self, ctx: &RunContext) {
        log::info!(
            "{} APPLY_COMPLETE applied={} skipped={} failed={}",
            ctx,
            self.applied.len(),
            self.skipped.len(),
            self.failed.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::plan::{CheckSpec, PlannedOp, ReconcileAction};

    fn op(job: &str) -> PlannedOp {
        PlannedOp {
            action: ReconcileAction::CreateCheck {
                spec: CheckSpec {
                    job: job.to_string(),
                    name: job.to_uppercase(),
                    target: format!("https://{job}.example.com"),
                    frequency_ms: 60_000,
                    probes: vec![],
                },
            },
            applicable: true,
        }
    }

    #[test]
    fn test_failure_recorded_without_dropping_later_ops() {
        let mut report = ApplyReport::new();
        report.record_failed(&op("api"), ApplyError::Transport("timeout".to_string()));
        report.record_applied(&op("web"));

        assert!(report.has_failures());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].op, "create_check api");
        assert_eq!(report.applied, vec!["create_check web"]);
    }

    #[test]
    fn test_skip_tracking() {
        let mut report = ApplyReport::new();
        report.record_skipped(&op("api"));
        assert_eq!(report.skipped, vec!["create_check api"]);
        assert!(!report.has_failures());
    }
}
