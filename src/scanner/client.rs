//! Scanner service HTTP client.
//!
//! Two calls, both bounded by a hard timeout and authenticated with a shared
//! secret header:
//! - POST /api/scan  (active scan, long timeout)
//! - GET  /api/results  (polling, short timeout)
//!
//! A timeout or non-2xx response surfaces as a structured error; there is no
//! internal retry.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::error::ScanError;

const API_KEY_HEADER: &str = "X-API-KEY";

/// Optional credentials forwarded to the scanner for authenticated probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
}

/// Inbound scan request, as received from the host layer.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanRequest {
    pub target: String,
    #[serde(default)]
    pub creds: Option<Credentials>,
}

#[derive(Debug, Serialize)]
struct ScanBody<'a> {
    target: &'a str,
    creds: Option<&'a Credentials>,
}

/// Client for the external scanner service.
#[derive(Debug)]
pub struct ScannerClient {
    base_url: String,
    api_key: String,
    scan_timeout: std::time::Duration,
    results_timeout: std::time::Duration,
    http: reqwest::blocking::Client,
}

impl ScannerClient {
    pub fn new(config: &Config) -> Result<Self, ScanError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("mqttscan-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScanError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.scanner_base.clone(),
            api_key: config.api_key.clone(),
            scan_timeout: config.scan_timeout,
            results_timeout: config.results_timeout,
            http,
        })
    }

    /// Run an active scan against a target. Blocks up to the scan timeout.
    pub fn scan(
        &self,
        target: &str,
        creds: Option<&Credentials>,
    ) -> Result<Vec<Value>, ScanError> {
        let url = format!("{}/api/scan", self.base_url);
        let response = self
            .http
            .post(&url)
            .timeout(self.scan_timeout)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&ScanBody { target, creds })
            .send()
            .map_err(|e| ScanError::ScannerUnreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::ScannerUnreachable(format!(
                "scanner returned HTTP {}",
                status.as_u16()
            )));
        }

        let body: Value = response
            .json()
            .map_err(|e| ScanError::ScannerUnreachable(format!("invalid response body: {}", e)))?;
        Ok(extract_results(body))
    }

    /// Poll previously computed results. Blocks up to the results timeout.
    pub fn fetch_results(&self) -> Result<Vec<Value>, ScanError> {
        let url = format!("{}/api/results", self.base_url);
        let response = self
            .http
            .get(&url)
            .timeout(self.results_timeout)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .map_err(|e| ScanError::ResultsFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::ResultsFetch(format!(
                "scanner returned HTTP {}",
                status.as_u16()
            )));
        }

        let body: Value = response
            .json()
            .map_err(|e| ScanError::ResultsFetch(format!("invalid response body: {}", e)))?;
        Ok(extract_results(body))
    }
}

/// The scanner has shipped both `{"status": .., "results": [..]}` envelopes
/// and bare arrays; accept either.
fn extract_results(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
