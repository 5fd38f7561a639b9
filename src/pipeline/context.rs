//! Pipeline context management.
//!
//! Provides scan and target context for logging and state tracking.

use chrono::{DateTime, Utc};

use crate::logging::structured::LogContext;

/// Context for one scan run moving through the pipeline.
#[derive(Debug, Clone)]
pub struct ScanContext {
    pub scan_id: String,
    pub owner_user_id: i64,
    pub target: String,
    pub started_at: DateTime<Utc>,
}

impl ScanContext {
    pub fn new(scan_id: &str, owner_user_id: i64, target: &str) -> Self {
        Self {
            scan_id: scan_id.to_string(),
            owner_user_id,
            target: target.to_string(),
            started_at: Utc::now(),
        }
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(&self.scan_id)
    }

    /// Create a per-endpoint context for this scan.
    pub fn target_context(&self, endpoint: &str) -> LogContext {
        self.log_context().with_target(endpoint)
    }
}
