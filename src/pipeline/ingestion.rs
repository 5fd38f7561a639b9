//! Scan result ingestion pipeline.
//!
//! Coordinates the full per-scan workflow:
//! 1. Normalize each raw result (fail-soft)
//! 2. Classify risk
//! 3. Generate issues and recommendations
//! 4. Aggregate into a summary

use serde_json::Value;

use crate::classify::findings::{assess, SecurityAssessment};
use crate::normalize::{normalize, BrokerProbeResult};
use crate::report::summary::{summarize, ScanSummary};

use super::context::ScanContext;

/// Result of processing a single target.
#[derive(Debug, Clone)]
pub struct TargetReport {
    pub result: BrokerProbeResult,
    pub assessment: SecurityAssessment,
    pub decode_warnings: usize,
}

/// Result of processing one scan's raw results.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub received_count: usize,
    pub decode_warning_count: usize,
    pub targets: Vec<TargetReport>,
    pub summary: ScanSummary,
}

impl ScanReport {
    /// The canonical results, in received order, for storage.
    pub fn into_results(self) -> Vec<BrokerProbeResult> {
        self.targets.into_iter().map(|t| t.result).collect()
    }
}

/// Process all raw results for a scan.
///
/// Main entry point for result processing. Never fails: malformed entries
/// degrade to defaulted records with warnings.
pub fn process_results(ctx: &ScanContext, raw_results: &[Value]) -> ScanReport {
    let log_ctx = ctx.log_context();
    log::info!(
        "{} RESULTS_RECEIVED target={} count={}",
        log_ctx,
        ctx.target,
        raw_results.len()
    );

    let mut targets = Vec::with_capacity(raw_results.len());
    let mut decode_warning_count = 0;

    for raw in raw_results {
        let report = process_single_result(ctx, raw);
        decode_warning_count += report.decode_warnings;
        targets.push(report);
    }

    let summary = summarize_targets(&targets);

    log::info!(
        "{} SCAN_PIPELINE_COMPLETE received={} reachable={} vulnerable={} decode_warnings={}",
        log_ctx,
        raw_results.len(),
        summary.reachable_count,
        summary.vulnerable_count,
        decode_warning_count
    );

    ScanReport {
        received_count: raw_results.len(),
        decode_warning_count,
        targets,
        summary,
    }
}

/// Process a single raw result.
fn process_single_result(ctx: &ScanContext, raw: &Value) -> TargetReport {
    let normalized = normalize(raw, &ctx.log_context());
    let target_ctx = ctx.target_context(&normalized.result.endpoint());

    let assessment = assess(&normalized.result);

    log::info!(
        "{} TARGET_ASSESSED classification={} risk={} issues={}",
        target_ctx,
        normalized.result.classification.as_str(),
        assessment.risk_level,
        assessment.issues.len()
    );

    TargetReport {
        result: normalized.result,
        assessment,
        decode_warnings: normalized.warnings.len(),
    }
}

fn summarize_targets(targets: &[TargetReport]) -> ScanSummary {
    // summarize() wants a contiguous slice of results.
    let results: Vec<BrokerProbeResult> = targets.iter().map(|t| t.result.clone()).collect();
    summarize(&results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::risk::RiskLevel;
    use serde_json::json;

    fn ctx() -> ScanContext {
        ScanContext::new("scan-test", 1, "127.0.0.1")
    }

    #[test]
    fn test_process_mixed_batch() {
        let raws = vec![
            json!({
                "ip": "127.0.0.1", "port": 1883, "tls": false,
                "classification": "open_or_auth_ok",
                "publishers": [{"topic": "a"}]
            }),
            json!({
                "ip": "127.0.0.1", "port": 8883, "tls": true,
                "classification": "not_authorized"
            }),
            json!({
                "ip": "10.0.0.9", "port": 1883,
                "classification": "closed_or_unreachable",
                "status": "unreachable"
            }),
        ];

        let report = process_results(&ctx(), &raws);
        assert_eq!(report.received_count, 3);
        assert_eq!(report.targets[0].assessment.risk_level, RiskLevel::Critical);
        assert_eq!(report.targets[1].assessment.risk_level, RiskLevel::Low);
        assert_eq!(report.summary.total_targets, 3);
        assert_eq!(report.summary.reachable_count, 2);
        assert_eq!(report.summary.unreachable_count, 1);
        assert_eq!(report.summary.vulnerable_count, 1);
    }

    #[test]
    fn test_malformed_entry_degrades_not_fails() {
        let raws = vec![
            json!({"ip": "127.0.0.1", "port": 1883, "publishers": "{bad json"}),
            json!("not an object"),
        ];

        let report = process_results(&ctx(), &raws);
        assert_eq!(report.received_count, 2);
        assert_eq!(report.decode_warning_count, 2);
        // Both still produced complete records and assessments.
        assert_eq!(report.targets.len(), 2);
        assert_eq!(report.targets[0].assessment.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_empty_batch() {
        let report = process_results(&ctx(), &[]);
        assert_eq!(report.received_count, 0);
        assert_eq!(report.summary, ScanSummary::default());
    }
}
