//! Statuspilot Core - status page decision logic
//!
//! This crate holds the decision core that keeps a public status page in
//! step with live service health. It is a pure function of its inputs:
//!
//! 1. **Status Engine** - (reachability, latency) samples become component
//!    statuses against resolved thresholds
//! 2. **Reconciliation Engine** - desired endpoint config diffed against
//!    live checks/components/metrics into an ordered operation plan
//! 3. **Incident Lifecycle** - status transitions drive incident create /
//!    heartbeat / escalate / resolve / postmortem operations
//!
//! The core performs no network I/O and persists nothing between runs;
//! every run rebuilds its view from explicit snapshot arguments, so a
//! partially-applied run converges on the next invocation. The surrounding
//! orchestration (metric queries, provider API calls, publishing) lives
//! outside this crate and can drive it through the optional `python`
//! feature's PyO3 module.
//!
//! ## Architecture
//!
//! - `config` - desired-state model: endpoints, thresholds, incident settings
//! - `status` - sample classification, aggregation, snapshots
//! - `reconcile` - live-state diffing and plan computation
//! - `incident` - incident state machine, copy templating, postmortems
//! - `error` - apply-time error taxonomy
//! - `logging` - structured logging with run context

pub mod config;
pub mod error;
pub mod incident;
pub mod logging;
pub mod reconcile;
pub mod status;

#[cfg(feature = "python")]
mod python;

/// Initialize the module-level logger.
///
/// Safe to call repeatedly; only the first call takes effect.
pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_millis()
        .try_init();
}
