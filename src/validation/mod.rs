//! Request validation module.
//!
//! Rejects malformed scan requests before any external call is made.

pub mod target;

pub use target::*;
