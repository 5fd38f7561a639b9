//! Process configuration.
//!
//! Built once at startup and passed into the components that need the
//! scanner endpoint and shared secret. The secret has no hardcoded fallback:
//! it must be supplied explicitly or through the environment.

use std::env;
use std::time::Duration;

use crate::error::ScanError;
use crate::limit::{DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW};

/// Configuration for the scan service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the external scanner service.
    pub scanner_base: String,
    /// Shared secret sent as `X-API-KEY` on every scanner request.
    pub api_key: String,
    /// Hard timeout for an active scan request.
    pub scan_timeout: Duration,
    /// Hard timeout for results polling.
    pub results_timeout: Duration,
    /// Scans allowed per user per window.
    pub rate_limit_max: u32,
    /// Rate limit window length.
    pub rate_limit_window: Duration,
}

impl Config {
    pub fn new(scanner_base: &str, api_key: &str) -> Self {
        Self {
            scanner_base: scanner_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            scan_timeout: Duration::from_secs(30),
            results_timeout: Duration::from_secs(5),
            rate_limit_max: DEFAULT_MAX_ATTEMPTS,
            rate_limit_window: DEFAULT_WINDOW,
        }
    }

    /// Load configuration from the environment.
    ///
    /// `SCANNER_API_KEY` is required; `SCANNER_BASE` defaults to the local
    /// scanner. Timeout overrides are in seconds.
    pub fn from_env() -> Result<Self, ScanError> {
        let api_key = env::var("SCANNER_API_KEY")
            .map_err(|_| ScanError::Config("SCANNER_API_KEY is not set".to_string()))?;
        if api_key.is_empty() {
            return Err(ScanError::Config("SCANNER_API_KEY is empty".to_string()));
        }

        let scanner_base =
            env::var("SCANNER_BASE").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());

        let mut config = Self::new(&scanner_base, &api_key);

        if let Some(secs) = env_secs("SCANNER_SCAN_TIMEOUT_SECS") {
            config.scan_timeout = secs;
        }
        if let Some(secs) = env_secs("SCANNER_RESULTS_TIMEOUT_SECS") {
            config.results_timeout = secs;
        }
        if let Ok(v) = env::var("SCAN_RATE_LIMIT_MAX") {
            if let Ok(n) = v.parse() {
                config.rate_limit_max = n;
            }
        }
        if let Some(secs) = env_secs("SCAN_RATE_LIMIT_WINDOW_SECS") {
            config.rate_limit_window = secs;
        }

        Ok(config)
    }
}

fn env_secs(name: &str) -> Option<Duration> {
    env::var(name).ok()?.parse().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new("http://127.0.0.1:5000", "test-key");
        assert_eq!(config.scan_timeout, Duration::from_secs(30));
        assert_eq!(config.results_timeout, Duration::from_secs(5));
        assert_eq!(config.rate_limit_max, 10);
        assert_eq!(config.rate_limit_window, Duration::from_secs(60));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = Config::new("http://scanner:5000/", "k");
        assert_eq!(config.scanner_base, "http://scanner:5000");
    }
}
