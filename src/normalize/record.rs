//! Canonical broker probe result.
//!
//! The fully-defaulted record every downstream stage consumes. Normalization
//! guarantees no field is ever absent, which is what makes the classifier and
//! finding generator total functions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Well-known plaintext MQTT port.
pub const PLAINTEXT_PORT: u16 = 1883;
/// Well-known MQTT-over-TLS port.
pub const TLS_PORT: u16 = 8883;

/// The external scanner's coarse verdict on an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    OpenOrAuthOk,
    NotAuthorized,
    ClosedOrUnreachable,
    #[default]
    Unknown,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::OpenOrAuthOk => "open_or_auth_ok",
            Classification::NotAuthorized => "not_authorized",
            Classification::ClosedOrUnreachable => "closed_or_unreachable",
            Classification::Unknown => "unknown",
        }
    }

    /// Parse a scanner verdict string. Unrecognized spellings map to Unknown
    /// rather than failing.
    pub fn parse(s: &str) -> Self {
        match s {
            "open_or_auth_ok" => Classification::OpenOrAuthOk,
            "not_authorized" => Classification::NotAuthorized,
            "closed_or_unreachable" => Classification::ClosedOrUnreachable,
            _ => Classification::Unknown,
        }
    }
}

/// Whether the broker demanded credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthRequired {
    Yes,
    No,
    #[default]
    Unknown,
}

impl AuthRequired {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthRequired::Yes => "yes",
            AuthRequired::No => "no",
            AuthRequired::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "yes" => AuthRequired::Yes,
            "no" => AuthRequired::No,
            _ => AuthRequired::Unknown,
        }
    }
}

/// One captured message publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub topic: String,
    #[serde(default)]
    pub payload: String,
    #[serde(default)]
    pub qos: u8,
    #[serde(default)]
    pub retained: bool,
}

impl Default for Publisher {
    fn default() -> Self {
        Self {
            topic: "Unknown".to_string(),
            payload: String::new(),
            qos: 0,
            retained: false,
        }
    }
}

/// Structured explanation of why a result has its classification.
/// Primarily populated for unreachable/timeout cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Outcome {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub security_implication: String,
    #[serde(default)]
    pub evidence_signal: String,
}

/// Canonical, post-normalization record for one scanned ip:port endpoint.
///
/// Every field has a defined default, so the record is always complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BrokerProbeResult {
    pub ip: String,
    pub port: u16,

    /// Raw scanner verdict string (`connected`, `reachable`, `open`, ...).
    /// Kept alongside the coarse classification because the reachability
    /// summary keys off both.
    pub status: String,
    pub classification: Classification,

    pub tls_enabled: bool,
    pub auth_required: AuthRequired,
    pub anonymous_allowed: bool,

    pub cert_subject: Option<Value>,
    pub cert_issuer: Option<Value>,
    pub cert_not_before: Option<DateTime<Utc>>,
    pub cert_not_after: Option<DateTime<Utc>>,
    pub cert_error: Option<String>,

    pub publishers: Vec<Publisher>,
    pub topics: BTreeSet<String>,
    pub sys_topic_count: u32,
    pub regular_topic_count: u32,
    pub retained_count: u32,

    pub outcome: Option<Outcome>,
    pub error: Option<String>,
    pub response_time: Option<f64>,
}

impl BrokerProbeResult {
    /// Endpoint label used in log contexts.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }

    /// True when the TCP/TLS layer responded, regardless of auth outcome.
    pub fn is_reachable(&self) -> bool {
        matches!(
            self.classification,
            Classification::OpenOrAuthOk | Classification::NotAuthorized
        ) || matches!(self.status.as_str(), "connected" | "reachable" | "open")
    }

    /// True when the broker accepts connections without credentials.
    pub fn is_vulnerable(&self) -> bool {
        self.anonymous_allowed
    }

    /// Distinct topic names observed across captured publications.
    pub fn publisher_topics(&self) -> BTreeSet<&str> {
        self.publishers.iter().map(|p| p.topic.as_str()).collect()
    }
}
