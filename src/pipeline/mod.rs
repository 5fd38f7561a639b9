//! Pipeline orchestration module.
//!
//! Runs the classification pipeline over a scan's raw results:
//! - Normalization (alias resolution, fail-soft decoding)
//! - Risk classification
//! - Issue/recommendation generation
//! - Summary aggregation
//!
//! Pure apart from logging; safe to invoke concurrently across scans.

pub mod context;
pub mod ingestion;

pub use context::*;
pub use ingestion::*;
