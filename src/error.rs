//! Apply-time error taxonomy.
//!
//! The core itself is total: planning and classification always produce a
//! best-effort result. Errors exist only at the apply boundary, where an
//! external call can fail; a failed call means "operation not applied this
//! run" and a re-run converges, so nothing here is process-fatal.

use thiserror::Error;

/// Failure applying a single planned operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// Transport-level failure (timeout, connection reset). The operation
    /// may or may not have taken effect; idempotent re-planning absorbs
    /// either outcome.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The provider accepted the request and rejected it.
    #[error("rejected by provider: {0}")]
    Rejected(String),

    /// The provider reported a capacity limit (e.g. the page metric cap).
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),
}
