//! Error taxonomy.
//!
//! One variant per failure class so callers branch on kind instead of
//! catching a generic error. Decode failures in individual result fields are
//! deliberately absent: they are recovered inside the normalizer and surface
//! only as warnings, never as errors.

use thiserror::Error;

/// Failure classes for the scan service.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Malformed target or credentials; rejected before any external call.
    #[error("{0}")]
    InvalidTarget(String),

    /// Fixed-window rate limit exceeded; rejected before any external call.
    #[error("Too many scan requests. Please wait before scanning again.")]
    RateLimited { retry_after_secs: u64 },

    /// Scanner unreachable, timed out, or returned a non-success status on
    /// an active scan.
    #[error("Failed to reach scanner: {0}")]
    ScannerUnreachable(String),

    /// Results polling failed.
    #[error("Failed to fetch results: {0}")]
    ResultsFetch(String),

    /// The scan run could not be persisted.
    #[error("Failed to store scan run: {0}")]
    Storage(String),

    /// Invalid or incomplete process configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScanError {
    /// HTTP status the host layer should respond with.
    pub fn status_code(&self) -> u16 {
        match self {
            ScanError::InvalidTarget(_) => 422,
            ScanError::RateLimited { .. } => 429,
            ScanError::ScannerUnreachable(_) => 500,
            ScanError::ResultsFetch(_) => 503,
            ScanError::Storage(_) => 500,
            ScanError::Config(_) => 500,
        }
    }

    /// Retry-after hint, present only for rate-limit rejections.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            ScanError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ScanError::InvalidTarget("x".into()).status_code(), 422);
        assert_eq!(
            ScanError::RateLimited { retry_after_secs: 30 }.status_code(),
            429
        );
        assert_eq!(
            ScanError::ScannerUnreachable("timeout".into()).status_code(),
            500
        );
        assert_eq!(ScanError::ResultsFetch("timeout".into()).status_code(), 503);
    }

    #[test]
    fn test_retry_after_only_for_rate_limit() {
        assert_eq!(
            ScanError::RateLimited { retry_after_secs: 42 }.retry_after_secs(),
            Some(42)
        );
        assert_eq!(
            ScanError::ScannerUnreachable("x".into()).retry_after_secs(),
            None
        );
    }
}
