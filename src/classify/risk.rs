//! Risk level classification.
//!
//! Assigns exactly one risk level to every normalized result. The precedence
//! is fixed and ordered: absence of transport encryption dominates the
//! assessment regardless of the authentication outcome, because plaintext
//! MQTT exposes payload content even when access control is correct.

use serde::{Deserialize, Serialize};

use crate::normalize::record::{BrokerProbeResult, Classification, PLAINTEXT_PORT};

/// Risk level, ordered by severity (`Critical` is greatest).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    #[default]
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "CRITICAL",
            RiskLevel::High => "HIGH",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::Low => "LOW",
            RiskLevel::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a normalized result.
///
/// # Decision tree (first match wins)
/// 1. No TLS on port 1883 -> Critical
/// 2. Open access without TLS -> High
/// 3. TLS but open access -> Medium
/// 4. TLS with auth enforced -> Low
/// 5. Otherwise -> Unknown
pub fn classify(r: &BrokerProbeResult) -> RiskLevel {
    if !r.tls_enabled && r.port == PLAINTEXT_PORT {
        return RiskLevel::Critical;
    }
    if r.classification == Classification::OpenOrAuthOk && !r.tls_enabled {
        return RiskLevel::High;
    }
    if r.tls_enabled && r.classification == Classification::OpenOrAuthOk {
        return RiskLevel::Medium;
    }
    if r.tls_enabled && r.classification == Classification::NotAuthorized {
        return RiskLevel::Low;
    }
    RiskLevel::Unknown
}
