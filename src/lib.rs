//! mqttscan-core: MQTT broker scan result classification engine.
//!
//! Turns heterogeneous scanner output into canonical broker records, risk
//! classifications, remediation guidance, and per-scan summaries.
//!
//! # Architecture
//!
//! - `normalize/` - Canonical record model and fail-soft raw result decoding
//! - `classify/` - Risk level precedence and issue/recommendation generation
//! - `report/` - Scan summaries and the scan run state machine
//! - `pipeline/` - Per-scan processing workflow (normalize, classify, aggregate)
//! - `scanner/` - HTTP client for the external scanner service
//! - `service/` - End-to-end orchestration (validate, limit, scan, persist)
//! - `storage/` - Row models, SQL builders, and the `ScanStore` seam
//! - `validation/` - Target and credential input validation
//! - `limit` - Per-user fixed-window rate limiting
//! - `config` - Process configuration
//! - `error` - Structured error types with HTTP status mapping
//! - `logging/` - Structured logging context

pub mod classify;
pub mod config;
pub mod error;
pub mod limit;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod service;
pub mod storage;
pub mod validation;

pub use classify::findings::{assess, SecurityAssessment};
pub use classify::risk::{classify, RiskLevel};
pub use config::Config;
pub use error::ScanError;
pub use normalize::{normalize, BrokerProbeResult, Normalized};
pub use pipeline::ingestion::{process_results, ScanReport};
pub use report::scan_run::{ScanRun, ScanStatus};
pub use report::summary::{summarize, ScanSummary};
pub use scanner::client::{Credentials, ScanRequest, ScannerClient};
pub use service::ScanService;
pub use storage::store::{MemoryStore, ScanStore};

/// Initialize logging for standalone use.
pub fn init_logger() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_millis()
        .try_init();
}
