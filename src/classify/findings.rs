//! Issue and recommendation generation.
//!
//! Derives human-readable findings and remediation advice from the canonical
//! record. Finding order is significant and stable: report fixtures key off
//! the exact list order.

use serde::{Deserialize, Serialize};

use crate::classify::risk::{classify, RiskLevel};
use crate::normalize::record::{BrokerProbeResult, Classification, PLAINTEXT_PORT, TLS_PORT};

/// Derived security assessment for one endpoint. Never persisted apart from
/// the result it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityAssessment {
    pub risk_level: RiskLevel,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Generate the issue and recommendation lists for a result.
///
/// Pure function; calling it twice with identical input yields identical
/// lists in identical order.
pub fn generate(r: &BrokerProbeResult) -> (Vec<String>, Vec<String>) {
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    if r.port == PLAINTEXT_PORT && !r.tls_enabled {
        issues.push(format!(
            "Using insecure port ({}) - no encryption",
            PLAINTEXT_PORT
        ));
        recommendations.push(format!("Migrate to port {} with TLS/SSL", TLS_PORT));
    }

    if r.classification == Classification::OpenOrAuthOk {
        issues.push("Anonymous access is allowed".to_string());
        recommendations.push("Enable authentication and disable anonymous access".to_string());
    }

    if !r.publishers.is_empty() && !r.tls_enabled {
        issues.push(format!(
            "{} publishers detected on unsecured broker",
            r.publishers.len()
        ));
    }

    let topic_count = r.publisher_topics().len();
    if topic_count > 0 {
        issues.push(format!("{} active topics detected", topic_count));
    }

    recommendations.push("Review topic ACLs and implement proper authorization.".to_string());

    if r.tls_enabled {
        recommendations.push("Verify certificate validity and renewal dates.".to_string());
    }

    (issues, recommendations)
}

/// Full assessment: risk level plus findings.
pub fn assess(r: &BrokerProbeResult) -> SecurityAssessment {
    let (issues, recommendations) = generate(r);
    SecurityAssessment {
        risk_level: classify(r),
        issues,
        recommendations,
    }
}
