//! External scanner interface.
//!
//! HTTP client for the out-of-process scanner service. This crate never
//! probes the network itself; it consumes the scanner's JSON output only.

pub mod client;

pub use client::*;
