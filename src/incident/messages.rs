//! Incident copy templating.
//!
//! Deterministic subscriber-facing text for every lifecycle event, keyed by
//! the component's status so the wording matches the severity.

use crate::status::ComponentStatus;

fn status_phrase(status: ComponentStatus) -> &'static str {
    match status {
        ComponentStatus::MajorOutage => "a major outage",
        ComponentStatus::DegradedPerformance => "degraded performance",
        ComponentStatus::Operational => "issues",
    }
}

/// Incident title, e.g. "Public API experiencing a major outage".
pub fn incident_name(component_label: &str, status: ComponentStatus) -> String {
    format!("{} experiencing {}", component_label, status_phrase(status))
}

/// Body for a freshly created incident.
pub fn opening_body(component_label: &str, status: ComponentStatus) -> String {
    match status {
        ComponentStatus::MajorOutage => format!(
            "We're aware of a major outage affecting **{}**. Our team is \
             actively investigating and working to restore service as quickly \
             as possible.",
            component_label
        ),
        ComponentStatus::DegradedPerformance => format!(
            "We're investigating reports of degraded performance affecting \
             **{}**. Some users may see slower response times or intermittent \
             errors. We'll post updates as we learn more.",
            component_label
        ),
        ComponentStatus::Operational => format!(
            "We're investigating an issue affecting **{}**. We'll post \
             updates as we learn more.",
            component_label
        ),
    }
}

/// Body for an escalation update. Always posted immediately.
pub fn escalation_body(component_label: &str) -> String {
    format!(
        "The situation affecting **{}** has escalated to a major service \
         disruption. Our team is working urgently to restore normal operation.",
        component_label
    )
}

/// Body for a quiet-period heartbeat reaffirming the investigation.
pub fn heartbeat_body(component_label: &str, status: ComponentStatus) -> String {
    match status {
        ComponentStatus::MajorOutage => format!(
            "We continue to monitor the situation affecting **{}**. The \
             service remains unavailable and our team is actively working on \
             a resolution.",
            component_label
        ),
        _ => format!(
            "We continue to monitor the situation affecting **{}**. The \
             service is still operating with reduced performance and our team \
             is actively working on a resolution.",
            component_label
        ),
    }
}

/// Body for the resolving update.
pub fn resolve_body(component_label: &str) -> String {
    format!(
        "This incident has been resolved. **{}** is back to normal \
         operation. Thank you for your patience.",
        component_label
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_reflects_status() {
        assert_eq!(
            incident_name("API", ComponentStatus::MajorOutage),
            "API experiencing a major outage"
        );
        assert_eq!(
            incident_name("API", ComponentStatus::DegradedPerformance),
            "API experiencing degraded performance"
        );
    }

    #[test]
    fn test_bodies_mention_component() {
        for body in [
            opening_body("Public API", ComponentStatus::MajorOutage),
            opening_body("Public API", ComponentStatus::DegradedPerformance),
            escalation_body("Public API"),
            heartbeat_body("Public API", ComponentStatus::DegradedPerformance),
            resolve_body("Public API"),
        ] {
            assert!(body.contains("**Public API**"), "missing component: {body}");
        }
    }

    #[test]
    fn test_outage_heartbeat_mentions_unavailability() {
        let body = heartbeat_body("API", ComponentStatus::MajorOutage);
        assert!(body.contains("unavailable"));
    }
}
