//! Result normalization.
//!
//! Coerces heterogeneous scanner output into the canonical
//! `BrokerProbeResult`:
//! - Alias resolution (variant field names, fixed precedence)
//! - Decoding of JSON-encoded string sub-objects (certs, publishers, outcome)
//! - Defaulting of every absent field
//!
//! Decode failures never fail the record or the batch: the field is treated
//! as absent and a warning is recorded with a content hash of the offending
//! text (never the text itself).

pub mod fields;
pub mod record;

pub use fields::*;
pub use record::*;

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::logging::structured::LogContext;

/// A recovered decode failure in a single result field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeWarning {
    pub field: &'static str,
    pub reason: String,
    /// SHA-256 of the undecodable text, for diagnostics without logging
    /// captured payload content.
    pub content_hash: String,
}

/// Normalization output: the complete canonical record plus any warnings
/// recovered along the way.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub result: BrokerProbeResult,
    pub warnings: Vec<DecodeWarning>,
}

/// Normalize one raw scanner result into the canonical record.
///
/// Total over arbitrary JSON input: a non-object value yields a fully
/// defaulted record with a single warning.
pub fn normalize(raw: &Value, ctx: &LogContext) -> Normalized {
    let mut warnings = Vec::new();

    if !raw.is_object() {
        push_warning(
            &mut warnings,
            ctx,
            "result",
            "expected JSON object",
            &raw.to_string(),
        );
        return Normalized {
            result: BrokerProbeResult::default(),
            warnings,
        };
    }

    let ip = raw
        .get("ip")
        .map(value_to_string)
        .unwrap_or_default();
    let port = resolve_alias(raw, &["port"])
        .and_then(value_to_int)
        .and_then(|i| u16::try_from(i).ok())
        .unwrap_or(0);

    let classification = resolve_alias(raw, CLASSIFICATION_ALIASES)
        .map(|v| Classification::parse(&value_to_string(v)))
        .unwrap_or_default();
    let status = resolve_alias(raw, STATUS_ALIASES)
        .map(value_to_string)
        .unwrap_or_else(|| "unknown".to_string());

    let tls_enabled = resolve_alias(raw, TLS_ALIASES)
        .and_then(value_to_bool)
        .unwrap_or(false);

    let auth_required = raw
        .get("auth_required")
        .map(|v| AuthRequired::parse(&value_to_string(v)))
        .unwrap_or_default();

    // broker_info is itself a sub-object that can arrive JSON-encoded.
    let broker_info = raw
        .get("broker_info")
        .and_then(|v| decode_structured(v, ctx, "broker_info", &mut warnings));
    let broker_info = broker_info.as_ref();

    let publishers = decode_publishers(raw.get("publishers"), ctx, &mut warnings);
    let topics = decode_topics(raw.get("topics"), broker_info, ctx, &mut warnings);

    let derived_sys = topics.iter().filter(|t| t.starts_with("$SYS")).count() as u32;
    let sys_topic_count = raw
        .get("sys_topic_count")
        .map(value_to_count)
        .or_else(|| broker_info.and_then(|b| b.get("sys_count")).map(value_to_count))
        .unwrap_or(derived_sys);
    let regular_topic_count = raw
        .get("regular_topic_count")
        .map(value_to_count)
        .or_else(|| {
            broker_info
                .and_then(|b| b.get("regular_count"))
                .map(value_to_count)
        })
        .unwrap_or(topics.len() as u32 - derived_sys.min(topics.len() as u32));
    let retained_count = raw
        .get("retained_count")
        .map(value_to_count)
        .or_else(|| {
            broker_info
                .and_then(|b| b.get("retained_topics"))
                .and_then(|v| v.as_array())
                .map(|a| a.len() as u32)
        })
        .unwrap_or_else(|| publishers.iter().filter(|p| p.retained).count() as u32);

    let cert_subject = raw
        .get("cert_subject")
        .and_then(|v| decode_cert_field(v, ctx, "cert_subject", &mut warnings));
    let cert_issuer = raw
        .get("cert_issuer")
        .and_then(|v| decode_cert_field(v, ctx, "cert_issuer", &mut warnings));
    let cert_not_before = resolve_alias(raw, CERT_NOT_BEFORE_ALIASES)
        .and_then(|v| decode_timestamp(v, ctx, "cert_not_before", &mut warnings));
    let cert_not_after = resolve_alias(raw, CERT_NOT_AFTER_ALIASES)
        .and_then(|v| decode_timestamp(v, ctx, "cert_not_after", &mut warnings));
    let cert_error = raw
        .get("cert_error")
        .filter(|v| !v.is_null())
        .map(value_to_string);

    let outcome = raw
        .get("outcome")
        .and_then(|v| decode_structured(v, ctx, "outcome", &mut warnings))
        .and_then(|v| match serde_json::from_value::<Outcome>(v.clone()) {
            Ok(o) => Some(o),
            Err(e) => {
                push_warning(&mut warnings, ctx, "outcome", &e.to_string(), &v.to_string());
                None
            }
        });

    let error = raw
        .get("error")
        .filter(|v| !v.is_null())
        .map(value_to_string)
        .or_else(|| {
            broker_info
                .and_then(|b| b.get("error"))
                .filter(|v| !v.is_null())
                .map(value_to_string)
        });

    let response_time = raw.get("response_time").and_then(value_to_float);

    // Derived: open access, or an explicit flag, or no auth demanded. Clamped
    // when the broker rejected the connection outright, which by definition
    // rules anonymous access out.
    let explicit_anonymous = raw
        .get("anonymous_allowed")
        .and_then(value_to_bool)
        .unwrap_or(false);
    let mut anonymous_allowed = explicit_anonymous
        || auth_required == AuthRequired::No
        || classification == Classification::OpenOrAuthOk;
    if classification == Classification::NotAuthorized && anonymous_allowed {
        log::debug!(
            "{} ANONYMOUS_FLAG_CLAMPED classification=not_authorized",
            ctx
        );
        anonymous_allowed = false;
    }

    Normalized {
        result: BrokerProbeResult {
            ip,
            port,
            status,
            classification,
            tls_enabled,
            auth_required,
            anonymous_allowed,
            cert_subject,
            cert_issuer,
            cert_not_before,
            cert_not_after,
            cert_error,
            publishers,
            topics,
            sys_topic_count,
            regular_topic_count,
            retained_count,
            outcome,
            error,
            response_time,
        },
        warnings,
    }
}

/// Decode a sub-object that may arrive as a JSON-encoded string.
///
/// Objects and arrays pass through; strings are parsed; anything else (or a
/// parse failure) yields a warning and None.
fn decode_structured(
    value: &Value,
    ctx: &LogContext,
    field: &'static str,
    warnings: &mut Vec<DecodeWarning>,
) -> Option<Value> {
    match value {
        Value::Object(_) | Value::Array(_) => Some(value.clone()),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(decoded @ (Value::Object(_) | Value::Array(_))) => Some(decoded),
            Ok(_) => {
                push_warning(warnings, ctx, field, "decoded to a scalar", s);
                None
            }
            Err(e) => {
                push_warning(warnings, ctx, field, &e.to_string(), s);
                None
            }
        },
        Value::Null => None,
        other => {
            push_warning(warnings, ctx, field, "unexpected scalar", &other.to_string());
            None
        }
    }
}

/// Certificate subject/issuer may legitimately be a raw distinguished-name
/// string; only strings that look like embedded JSON are parsed.
fn decode_cert_field(
    value: &Value,
    ctx: &LogContext,
    field: &'static str,
    warnings: &mut Vec<DecodeWarning>,
) -> Option<Value> {
    match value {
        Value::Object(_) | Value::Array(_) => Some(value.clone()),
        Value::String(s) => {
            let trimmed = s.trim_start();
            if trimmed.starts_with('{') || trimmed.starts_with('[') {
                match serde_json::from_str::<Value>(s) {
                    Ok(decoded) => Some(decoded),
                    Err(e) => {
                        push_warning(warnings, ctx, field, &e.to_string(), s);
                        None
                    }
                }
            } else if s.is_empty() {
                None
            } else {
                Some(Value::String(s.clone()))
            }
        }
        _ => None,
    }
}

/// Parse a timestamp from RFC 3339, the scanner's legacy
/// `YYYY-mm-dd HH:MM:SS` format, or a unix epoch number.
fn decode_timestamp(
    value: &Value,
    ctx: &LogContext,
    field: &'static str,
    warnings: &mut Vec<DecodeWarning>,
) -> Option<chrono::DateTime<chrono::Utc>> {
    use chrono::{DateTime, NaiveDateTime, Utc};

    match value {
        Value::String(s) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(naive.and_utc());
            }
            push_warning(warnings, ctx, field, "unparseable timestamp", s);
            None
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    }
}

/// Decode the captured publisher list. Malformed input becomes an empty list.
fn decode_publishers(
    value: Option<&Value>,
    ctx: &LogContext,
    warnings: &mut Vec<DecodeWarning>,
) -> Vec<Publisher> {
    let Some(value) = value else {
        return Vec::new();
    };
    let Some(decoded) = decode_structured(value, ctx, "publishers", warnings) else {
        return Vec::new();
    };
    let Some(entries) = decoded.as_array() else {
        push_warning(
            warnings,
            ctx,
            "publishers",
            "expected array",
            &decoded.to_string(),
        );
        return Vec::new();
    };

    entries
        .iter()
        .map(|entry| Publisher {
            topic: entry
                .get("topic")
                .map(value_to_string)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            payload: entry.get("payload").map(value_to_string).unwrap_or_default(),
            qos: entry
                .get("qos")
                .and_then(value_to_int)
                .and_then(|q| u8::try_from(q).ok())
                .unwrap_or(0),
            retained: entry
                .get("retained")
                .and_then(value_to_bool)
                .unwrap_or(false),
        })
        .collect()
}

/// Decode the observed topic set. Falls back to the keys of
/// `broker_info.sys_topics` / `broker_info.regular_topics`.
fn decode_topics(
    value: Option<&Value>,
    broker_info: Option<&Value>,
    ctx: &LogContext,
    warnings: &mut Vec<DecodeWarning>,
) -> std::collections::BTreeSet<String> {
    let mut topics = std::collections::BTreeSet::new();

    if let Some(value) = value {
        if let Some(decoded) = decode_structured(value, ctx, "topics", warnings) {
            match decoded {
                Value::Array(items) => {
                    for item in &items {
                        let name = value_to_string(item);
                        if !name.is_empty() {
                            topics.insert(name);
                        }
                    }
                    return topics;
                }
                // Some scanner builds emit {topic: payload} maps here.
                Value::Object(map) => {
                    topics.extend(map.keys().cloned());
                    return topics;
                }
                _ => {}
            }
        }
    }

    if let Some(info) = broker_info {
        for key in ["sys_topics", "regular_topics"] {
            if let Some(map) = info.get(key).and_then(|v| v.as_object()) {
                topics.extend(map.keys().cloned());
            }
        }
    }

    topics
}

fn push_warning(
    warnings: &mut Vec<DecodeWarning>,
    ctx: &LogContext,
    field: &'static str,
    reason: &str,
    content: &str,
) {
    let content_hash = hex::encode(Sha256::digest(content.as_bytes()));
    log::warn!(
        "{} RESULT_DECODE_WARNING field={} reason={} content_hash={}",
        ctx,
        field,
        reason,
        content_hash
    );
    warnings.push(DecodeWarning {
        field,
        reason: reason.to_string(),
        content_hash,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> LogContext {
        LogContext::new("scan-test")
    }

    #[test]
    fn test_normalize_complete_result() {
        let raw = json!({
            "ip": "192.168.1.10",
            "port": 8883,
            "classification": "not_authorized",
            "tls": true,
            "auth_required": "yes",
            "cert_subject": {"CN": "broker.local"},
            "cert_not_before": "2026-01-01T00:00:00Z",
            "cert_not_after": "2027-01-01T00:00:00Z",
            "publishers": [],
            "topics": ["$SYS/broker/uptime", "sensors/temp"]
        });

        let n = normalize(&raw, &ctx());
        assert!(n.warnings.is_empty());
        assert_eq!(n.result.port, 8883);
        assert_eq!(n.result.classification, Classification::NotAuthorized);
        assert!(n.result.tls_enabled);
        assert!(!n.result.anonymous_allowed);
        assert_eq!(n.result.sys_topic_count, 1);
        assert_eq!(n.result.regular_topic_count, 1);
        assert!(n.result.cert_not_before.is_some());
    }

    #[test]
    fn test_normalize_alias_fallbacks() {
        let raw = json!({
            "ip": "10.0.0.1",
            "port": 1883,
            "result": "open_or_auth_ok",
            "tls_enabled": false,
            "cert_valid_from": "2026-01-01 00:00:00"
        });

        let n = normalize(&raw, &ctx());
        assert_eq!(n.result.classification, Classification::OpenOrAuthOk);
        assert_eq!(n.result.status, "open_or_auth_ok");
        assert!(n.result.cert_not_before.is_some());
    }

    #[test]
    fn test_normalize_json_encoded_strings() {
        let raw = json!({
            "ip": "10.0.0.1",
            "port": 1883,
            "publishers": r#"[{"topic": "a", "payload": "1", "qos": 1, "retained": true}]"#,
            "outcome": r#"{"label": "Connected (1883)", "meaning": "m", "security_implication": "s", "evidence_signal": "e"}"#
        });

        let n = normalize(&raw, &ctx());
        assert!(n.warnings.is_empty());
        assert_eq!(n.result.publishers.len(), 1);
        assert_eq!(n.result.publishers[0].topic, "a");
        assert!(n.result.publishers[0].retained);
        assert_eq!(n.result.retained_count, 1);
        assert_eq!(n.result.outcome.as_ref().unwrap().label, "Connected (1883)");
    }

    #[test]
    fn test_malformed_publishers_fails_soft() {
        let raw = json!({
            "ip": "10.0.0.1",
            "port": 1883,
            "classification": "open_or_auth_ok",
            "publishers": "{not valid json"
        });

        let n = normalize(&raw, &ctx());
        assert!(n.result.publishers.is_empty());
        assert_eq!(n.warnings.len(), 1);
        assert_eq!(n.warnings[0].field, "publishers");
        // The record itself survives.
        assert_eq!(n.result.classification, Classification::OpenOrAuthOk);
    }

    #[test]
    fn test_normalize_defaults() {
        let n = normalize(&json!({}), &ctx());
        let r = &n.result;
        assert_eq!(r.port, 0);
        assert!(!r.tls_enabled);
        assert_eq!(r.classification, Classification::Unknown);
        assert_eq!(r.auth_required, AuthRequired::Unknown);
        assert_eq!(r.status, "unknown");
        assert!(r.publishers.is_empty());
        assert_eq!(r.sys_topic_count, 0);
    }

    #[test]
    fn test_normalize_non_object() {
        let n = normalize(&json!("nonsense"), &ctx());
        assert_eq!(n.warnings.len(), 1);
        assert_eq!(n.result, BrokerProbeResult::default());
    }

    #[test]
    fn test_anonymous_derivation() {
        let open = normalize(
            &json!({"classification": "open_or_auth_ok"}),
            &ctx(),
        );
        assert!(open.result.anonymous_allowed);

        let no_auth = normalize(&json!({"auth_required": "no"}), &ctx());
        assert!(no_auth.result.anonymous_allowed);

        // Explicit flag contradicting a rejected connection is clamped.
        let clamped = normalize(
            &json!({"classification": "not_authorized", "anonymous_allowed": true}),
            &ctx(),
        );
        assert!(!clamped.result.anonymous_allowed);
    }

    #[test]
    fn test_broker_info_counts() {
        let raw = json!({
            "ip": "127.0.0.1",
            "port": 1883,
            "broker_info": {
                "sys_count": 12,
                "regular_count": 3,
                "retained_topics": ["a", "b"],
                "sys_topics": {"$SYS/broker/version": "mosquitto"},
                "regular_topics": {"sensors/temp": "22.4"},
                "error": "partial capture"
            }
        });

        let n = normalize(&raw, &ctx());
        assert_eq!(n.result.sys_topic_count, 12);
        assert_eq!(n.result.regular_topic_count, 3);
        assert_eq!(n.result.retained_count, 2);
        assert_eq!(n.result.topics.len(), 2);
        assert_eq!(n.result.error.as_deref(), Some("partial capture"));
    }

    #[test]
    fn test_cert_field_raw_string_kept() {
        let raw = json!({
            "cert_subject": "CN=broker.local,O=Lab",
            "cert_issuer": "{\"CN\": \"Lab CA\"}"
        });

        let n = normalize(&raw, &ctx());
        assert_eq!(
            n.result.cert_subject,
            Some(json!("CN=broker.local,O=Lab"))
        );
        assert_eq!(n.result.cert_issuer, Some(json!({"CN": "Lab CA"})));
    }
}
