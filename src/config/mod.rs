//! Desired-state configuration model.
//!
//! The crate consumes configuration that has already been parsed and
//! validated upstream; these types are the contract for that data.

pub mod endpoints;
pub mod incidents;
pub mod thresholds;

pub use endpoints::Endpoint;
pub use incidents::IncidentConfig;
pub use thresholds::{resolve, ThresholdOverrides, ThresholdSet};
