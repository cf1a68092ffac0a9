//! Incident automation settings.

use serde::{Deserialize, Serialize};

/// Settings controlling the incident lifecycle manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentConfig {
    /// Master switch: when false no incident operations are emitted.
    #[serde(default = "default_true")]
    pub auto_create: bool,
    /// Publish a templated postmortem after each resolve.
    #[serde(default = "default_true")]
    pub auto_postmortem: bool,
    /// Deliver subscriber notifications on create/escalate/resolve.
    #[serde(default = "default_true")]
    pub notify_subscribers: bool,
    /// Minimum minutes between non-escalating updates. Zero means always post.
    #[serde(default = "default_quiet_period")]
    pub quiet_period_minutes: i64,
}

impl Default for IncidentConfig {
    fn default() -> Self {
        Self {
            auto_create: true,
            auto_postmortem: true,
            notify_subscribers: true,
            quiet_period_minutes: default_quiet_period(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_quiet_period() -> i64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IncidentConfig::default();
        assert!(config.auto_create);
        assert!(config.auto_postmortem);
        assert!(config.notify_subscribers);
        assert_eq!(config.quiet_period_minutes, 60);
    }

    #[test]
    fn test_deserialize_missing_fields_use_defaults() {
        let config: IncidentConfig = serde_json::from_str(r#"{"auto_create": false}"#).unwrap();
        assert!(!config.auto_create);
        assert!(config.auto_postmortem);
        assert_eq!(config.quiet_period_minutes, 60);
    }
}
