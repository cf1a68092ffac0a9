//! Declarative infrastructure reconciliation.
//!
//! Diffs desired endpoint configuration against the live infrastructure
//! state (synthetic checks, status-page components, latency metrics) and
//! computes an ordered plan of create/update/delete operations. Deletions
//! are always planned but only marked applicable when the caller enables
//! them. The live state is queried fresh each run; nothing is cached.

pub mod apply;
pub mod live;
pub mod plan;

pub use apply::ApplyReport;
pub use live::{InfrastructureState, LiveCheck, LiveComponent, LiveMetric};
pub use plan::{plan, CheckSpec, PlanDiagnostic, PlannedOp, ReconcileAction, ReconciliationPlan};
