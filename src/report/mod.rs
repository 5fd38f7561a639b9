//! Aggregate reporting module.
//!
//! Combines per-target results into scan-level state:
//! - `ScanSummary` counts, recomputed from results (never hand-maintained)
//! - `ScanRun` lifecycle (running -> completed | failed)

pub mod scan_run;
pub mod summary;

pub use scan_run::*;
pub use summary::*;
