//! Scan summary counts.

use serde::{Deserialize, Serialize};

use crate::normalize::record::BrokerProbeResult;

/// Aggregate counts for one scan run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScanSummary {
    pub total_targets: u32,
    pub reachable_count: u32,
    pub unreachable_count: u32,
    pub vulnerable_count: u32,
}

/// Recompute summary counts from a result set.
///
/// Idempotent: no hidden counters, no incremental state. Unreachable is
/// defined as the complement of reachable, so
/// `reachable + unreachable == total` holds by construction.
pub fn summarize(results: &[BrokerProbeResult]) -> ScanSummary {
    let total_targets = results.len() as u32;
    let reachable_count = results.iter().filter(|r| r.is_reachable()).count() as u32;
    let vulnerable_count = results.iter().filter(|r| r.is_vulnerable()).count() as u32;

    ScanSummary {
        total_targets,
        reachable_count,
        unreachable_count: total_targets - reachable_count,
        vulnerable_count,
    }
}
