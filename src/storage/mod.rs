//! Storage module.
//!
//! Row models, SQL query builders, and the `ScanStore` seam. Actual SQL
//! execution is handled by the host application; this module guarantees that
//! JSON-valued columns round-trip through the normalizer and that a run and
//! its results are stored together or not at all.

pub mod models;
pub mod queries;
pub mod store;

pub use models::*;
pub use queries::*;
pub use store::*;
