//! Scan run lifecycle.
//!
//! A `ScanRun` owns its results exclusively; the summary is recomputed on
//! every mutation so raw results and counts can never drift apart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::normalize::record::BrokerProbeResult;
use crate::report::summary::{summarize, ScanSummary};

/// Scan run status. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Running,
    Completed,
    Failed,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Running => "running",
            ScanStatus::Completed => "completed",
            ScanStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanStatus::Completed | ScanStatus::Failed)
    }
}

/// One scan run: created at scan start, mutated as results arrive, finalized
/// on completion or failure.
///
/// `results` and `summary` are private: every mutation goes through a method
/// that recomputes the summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRun {
    pub id: String,
    pub owner_user_id: i64,
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    status: ScanStatus,
    results: Vec<BrokerProbeResult>,
    summary: ScanSummary,
    error_message: Option<String>,
}

impl ScanRun {
    pub fn new(owner_user_id: i64, target: &str) -> Self {
        let id = format!("scan-{}", &Uuid::new_v4().to_string()[..8]);
        Self {
            id,
            owner_user_id,
            target: target.to_string(),
            started_at: Utc::now(),
            completed_at: None,
            status: ScanStatus::Running,
            results: Vec::new(),
            summary: ScanSummary::default(),
            error_message: None,
        }
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn results(&self) -> &[BrokerProbeResult] {
        &self.results
    }

    pub fn summary(&self) -> &ScanSummary {
        &self.summary
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Scan duration in seconds, once the run is finalized.
    pub fn duration_secs(&self) -> Option<f64> {
        self.completed_at
            .map(|done| (done - self.started_at).num_milliseconds() as f64 / 1000.0)
    }

    /// Append a result, recomputing the summary.
    ///
    /// Ignored (with a warning) once the run is terminal.
    pub fn push_result(&mut self, result: BrokerProbeResult) {
        if self.status.is_terminal() {
            log::warn!(
                "[scan={}] RESULT_AFTER_TERMINAL status={}",
                self.id,
                self.status.as_str()
            );
            return;
        }
        self.results.push(result);
        self.summary = summarize(&self.results);
    }

    /// Replace the result set wholesale, recomputing the summary.
    pub fn set_results(&mut self, results: Vec<BrokerProbeResult>) {
        if self.status.is_terminal() {
            log::warn!(
                "[scan={}] RESULT_AFTER_TERMINAL status={}",
                self.id,
                self.status.as_str()
            );
            return;
        }
        self.results = results;
        self.summary = summarize(&self.results);
    }

    /// Transition running -> completed. Returns false (and logs) if the run
    /// is already terminal; terminal states are never left.
    pub fn mark_completed(&mut self) -> bool {
        if self.status.is_terminal() {
            log::warn!(
                "[scan={}] TRANSITION_REJECTED from={} to=completed",
                self.id,
                self.status.as_str()
            );
            return false;
        }
        self.status = ScanStatus::Completed;
        self.completed_at = Some(Utc::now());
        log::info!(
            "[scan={}] SCAN_COMPLETED targets={} reachable={} vulnerable={}",
            self.id,
            self.summary.total_targets,
            self.summary.reachable_count,
            self.summary.vulnerable_count
        );
        true
    }

    /// Transition running -> failed, retaining the raw error text for
    /// diagnostics. Returns false if the run is already terminal.
    pub fn mark_failed(&mut self, error_message: &str) -> bool {
        if self.status.is_terminal() {
            log::warn!(
                "[scan={}] TRANSITION_REJECTED from={} to=failed",
                self.id,
                self.status.as_str()
            );
            return false;
        }
        self.status = ScanStatus::Failed;
        self.completed_at = Some(Utc::now());
        self.error_message = Some(error_message.to_string());
        log::error!("[scan={}] SCAN_FAILED error={}", self.id, error_message);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::record::Classification;

    fn reachable_result() -> BrokerProbeResult {
        BrokerProbeResult {
            classification: Classification::OpenOrAuthOk,
            anonymous_allowed: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_run_is_running() {
        let run = ScanRun::new(1, "192.168.1.0/24");
        assert_eq!(run.status(), ScanStatus::Running);
        assert!(run.completed_at.is_none());
        assert!(run.id.starts_with("scan-"));
        assert_eq!(run.summary().total_targets, 0);
    }

    #[test]
    fn test_summary_tracks_results() {
        let mut run = ScanRun::new(1, "10.0.0.1");
        run.push_result(reachable_result());
        run.push_result(BrokerProbeResult::default());

        assert_eq!(run.summary().total_targets, 2);
        assert_eq!(run.summary().reachable_count, 1);
        assert_eq!(run.summary().vulnerable_count, 1);
    }

    #[test]
    fn test_complete_sets_terminal_state() {
        let mut run = ScanRun::new(1, "10.0.0.1");
        assert!(run.mark_completed());
        assert_eq!(run.status(), ScanStatus::Completed);
        assert!(run.completed_at.is_some());
        assert!(run.duration_secs().is_some());
    }

    #[test]
    fn test_no_transition_out_of_terminal() {
        let mut run = ScanRun::new(1, "10.0.0.1");
        assert!(run.mark_failed("scanner timeout"));
        assert_eq!(run.error_message(), Some("scanner timeout"));

        assert!(!run.mark_completed());
        assert!(!run.mark_failed("again"));
        assert_eq!(run.status(), ScanStatus::Failed);
        assert_eq!(run.error_message(), Some("scanner timeout"));
    }

    #[test]
    fn test_results_ignored_after_terminal() {
        let mut run = ScanRun::new(1, "10.0.0.1");
        run.mark_completed();
        run.push_result(reachable_result());
        assert!(run.results().is_empty());
        assert_eq!(run.summary().total_targets, 0);
    }
}
