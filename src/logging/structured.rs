//! Run-scoped logging context.
//!
//! Every run of the core (a status evaluation, a reconciliation pass, an
//! incident sweep) gets a short run id so log lines from interleaved
//! scheduler invocations can be told apart. Component-scoped work narrows
//! the context further.

use std::fmt;

use uuid::Uuid;

/// Logging context for one run of the core.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub component: Option<String>,
}

impl RunContext {
    /// Create a fresh context with a generated run id.
    pub fn new() -> Self {
        Self {
            run_id: format!("run-{}", &Uuid::new_v4().to_string()[..8]),
            component: None,
        }
    }

    /// Create a context with a caller-supplied run id.
    pub fn with_id(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            component: None,
        }
    }

    /// Narrow the context to a single component.
    pub fn for_component(&self, key: &str) -> Self {
        Self {
            run_id: self.run_id.clone(),
            component: Some(key.to_string()),
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.component {
            Some(key) => write!(f, "[run={}] [component={}]", self.run_id, key),
            None => write!(f, "[run={}]", self.run_id),
        }
    }
}
