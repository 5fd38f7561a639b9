//! Database row models.
//!
//! JSON-valued fields (certificates, publishers, topics, outcome) are stored
//! as encoded text and must round-trip through the normalizer's decode step
//! on read: decoding a persisted row yields the same canonical record that
//! was written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::logging::structured::LogContext;
use crate::normalize::{normalize, BrokerProbeResult};
use crate::report::scan_run::ScanRun;

/// Row for the `mqtt_scan_histories` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRunRow {
    pub id: String,
    pub user_id: i64,
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration: Option<f64>,
    pub status: String,
    pub total_targets: u32,
    pub reachable_count: u32,
    pub unreachable_count: u32,
    pub vulnerable_count: u32,
    pub error_message: Option<String>,
}

impl ScanRunRow {
    pub fn from_run(run: &ScanRun) -> Self {
        let summary = run.summary();
        Self {
            id: run.id.clone(),
            user_id: run.owner_user_id,
            target: run.target.clone(),
            started_at: run.started_at,
            completed_at: run.completed_at,
            duration: run.duration_secs(),
            status: run.status().as_str().to_string(),
            total_targets: summary.total_targets,
            reachable_count: summary.reachable_count,
            unreachable_count: summary.unreachable_count,
            vulnerable_count: summary.vulnerable_count,
            error_message: run.error_message().map(|s| s.to_string()),
        }
    }
}

/// Row for the `mqtt_scan_results` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResultRow {
    pub scan_id: String,
    pub user_id: i64,
    pub ip: String,
    pub port: u16,
    pub status: String,
    pub classification: String,
    /// JSON text columns.
    pub outcome: Option<String>,
    pub auth_required: String,
    pub anonymous_allowed: bool,
    pub tls: bool,
    pub cert_subject: Option<String>,
    pub cert_issuer: Option<String>,
    pub cert_not_before: Option<DateTime<Utc>>,
    pub cert_not_after: Option<DateTime<Utc>>,
    pub cert_error: Option<String>,
    pub sys_topic_count: u32,
    pub regular_topic_count: u32,
    pub retained_count: u32,
    pub topics: Option<String>,
    pub publishers: Option<String>,
    pub error: Option<String>,
    pub response_time: Option<f64>,
}

impl ProbeResultRow {
    /// Encode a canonical result for storage.
    pub fn from_result(scan_id: &str, user_id: i64, r: &BrokerProbeResult) -> Self {
        Self {
            scan_id: scan_id.to_string(),
            user_id,
            ip: r.ip.clone(),
            port: r.port,
            status: r.status.clone(),
            classification: r.classification.as_str().to_string(),
            outcome: r
                .outcome
                .as_ref()
                .and_then(|o| serde_json::to_string(o).ok()),
            auth_required: r.auth_required.as_str().to_string(),
            anonymous_allowed: r.anonymous_allowed,
            tls: r.tls_enabled,
            cert_subject: r.cert_subject.as_ref().map(encode_json_column),
            cert_issuer: r.cert_issuer.as_ref().map(encode_json_column),
            cert_not_before: r.cert_not_before,
            cert_not_after: r.cert_not_after,
            cert_error: r.cert_error.clone(),
            sys_topic_count: r.sys_topic_count,
            regular_topic_count: r.regular_topic_count,
            retained_count: r.retained_count,
            topics: serde_json::to_string(&r.topics).ok(),
            publishers: serde_json::to_string(&r.publishers).ok(),
            error: r.error.clone(),
            response_time: r.response_time,
        }
    }

    /// Decode a persisted row back into the canonical record, routing the
    /// JSON text columns through the normalizer.
    pub fn decode(&self, ctx: &LogContext) -> BrokerProbeResult {
        let mut raw = json!({
            "ip": self.ip,
            "port": self.port,
            "status": self.status,
            "classification": self.classification,
            "auth_required": self.auth_required,
            "anonymous_allowed": self.anonymous_allowed,
            "tls": self.tls,
            "sys_topic_count": self.sys_topic_count,
            "regular_topic_count": self.regular_topic_count,
            "retained_count": self.retained_count,
        });
        let obj = raw.as_object_mut().unwrap();

        set_opt_str(obj, "outcome", &self.outcome);
        set_opt_str(obj, "cert_subject", &self.cert_subject);
        set_opt_str(obj, "cert_issuer", &self.cert_issuer);
        set_opt_str(obj, "cert_error", &self.cert_error);
        set_opt_str(obj, "topics", &self.topics);
        set_opt_str(obj, "publishers", &self.publishers);
        set_opt_str(obj, "error", &self.error);
        if let Some(ts) = self.cert_not_before {
            obj.insert("cert_not_before".to_string(), json!(ts.to_rfc3339()));
        }
        if let Some(ts) = self.cert_not_after {
            obj.insert("cert_not_after".to_string(), json!(ts.to_rfc3339()));
        }
        if let Some(rt) = self.response_time {
            obj.insert("response_time".to_string(), json!(rt));
        }

        normalize(&raw, ctx).result
    }
}

/// Raw certificate strings are stored as-is; structured values as JSON text.
/// The asymmetry mirrors the normalizer, which only parses strings that look
/// like embedded JSON.
fn encode_json_column(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn set_opt_str(
    obj: &mut serde_json::Map<String, Value>,
    key: &str,
    value: &Option<String>,
) {
    if let Some(s) = value {
        obj.insert(key.to_string(), Value::String(s.clone()));
    }
}
