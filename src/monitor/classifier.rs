// Event Classifier - Derives an action from one certificate event
//
// The monitor tier is checked against the primary subject only. Events that fail
// this gate are dropped before any per-domain work.

use crate::ct_logs::CertificateEvent;
use crate::keywords::KeywordSet;
use crate::monitor::sink::Severity;
use serde::Serialize;
use std::collections::HashSet;

/// Outcome of classifying one event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Action {
    /// Primary subject matched the monitor tier
    pub monitored: bool,
    /// Some domain matched the highlight tier
    pub highlighted: bool,
    /// Domains matching the alert tier, in certificate order, without repeats
    pub alerted_domains: Vec<String>,
}

impl Action {
    /// Action for an event that failed the gate
    pub fn dropped() -> Self {
        Self::default()
    }

    /// Severity of the record to emit, `None` for dropped events
    pub fn severity(&self) -> Option<Severity> {
        if !self.monitored {
            None
        } else if self.highlighted {
            Some(Severity::Critical)
        } else {
            Some(Severity::Notice)
        }
    }
}

/// Classify an event against the three keyword tiers
///
/// Pure: the same event and keyword set always give the same action.
pub fn classify(event: &CertificateEvent, keywords: &KeywordSet) -> Action {
    if !keywords.monitor.matches(&event.primary_subject) {
        return Action::dropped();
    }

    let mut highlighted = false;
    let mut alerted_domains = Vec::new();
    let mut seen = HashSet::new();

    for domain in &event.all_domains {
        if !highlighted && keywords.highlight.matches(domain) {
            highlighted = true;
        }
        if keywords.alert.matches(domain) && seen.insert(domain.as_str()) {
            alerted_domains.push(domain.clone());
        }
    }

    Action {
        monitored: true,
        highlighted,
        alerted_domains,
    }
}

/// Record body for a logged event: the full domain list
pub fn format_domains(domains: &[String]) -> String {
    format!("[{}]", domains.join(" "))
}
