//! Structured logging with scan context.
//!
//! Provides logging utilities that include scan_id and target
//! in every log message for easy correlation.

pub mod structured;

pub use structured::*;
