//! Incident lifecycle management.
//!
//! A per-component state machine driven purely by status transitions:
//! create on first degrade, heartbeat or escalate while degraded, resolve
//! on recovery, postmortem after resolution. Detection is stateless across
//! runs; everything is derived from the unresolved-incident list queried
//! from the status page each run.

pub mod lifecycle;
pub mod messages;
pub mod model;
pub mod postmortem;

pub use lifecycle::{reconcile_incidents, ComponentState, IncidentOperation};
pub use model::{impact_for, Impact, Incident, IncidentStatus, IncidentUpdate};
