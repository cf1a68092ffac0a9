//! Status determination engine.
//!
//! Converts raw (reachability, latency) samples into per-component status
//! and aggregates components into an overall status. All functions here are
//! pure; debouncing comes from wide metric query windows upstream, not from
//! persisted state.

pub mod engine;
pub mod snapshot;

pub use engine::{aggregate, classify, ComponentStatus, Sample};
pub use snapshot::{build_snapshot, has_status_changed, ComponentHealth, StatusSnapshot};
