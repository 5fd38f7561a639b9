//! Risk classification module.
//!
//! Derives the security assessment for a normalized probe result:
//! - Risk level (fixed five-level precedence scheme)
//! - Human-readable issues and remediation recommendations
//!
//! Both stages are total functions over the canonical record, so no error
//! path exists here by construction.

pub mod findings;
pub mod risk;

pub use findings::*;
pub use risk::*;
