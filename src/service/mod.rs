//! Scan service orchestration.
//!
//! The inbound contract, minus HTTP framing (owned by the host layer):
//! validate target -> rate limit -> external scan -> classification pipeline
//! -> run finalization -> transactional store.
//!
//! Failure classes surface as distinct `ScanError` variants; a transport
//! failure additionally leaves a `failed` run in the store with the raw
//! error text retained for diagnostics.

use serde_json::Value;

use crate::config::Config;
use crate::error::ScanError;
use crate::limit::RateLimiter;
use crate::pipeline::context::ScanContext;
use crate::pipeline::ingestion::{process_results, ScanReport};
use crate::report::scan_run::ScanRun;
use crate::scanner::client::{ScanRequest, ScannerClient};
use crate::storage::store::ScanStore;
use crate::validation::target::{validate_creds, validate_target};

/// Orchestrates scan requests end to end.
pub struct ScanService<S: ScanStore> {
    client: ScannerClient,
    limiter: RateLimiter,
    store: S,
}

impl<S: ScanStore> ScanService<S> {
    pub fn new(config: &Config, store: S) -> Result<Self, ScanError> {
        Ok(Self {
            client: ScannerClient::new(config)?,
            limiter: RateLimiter::new(config.rate_limit_max, config.rate_limit_window),
            store,
        })
    }

    /// Run one scan for a user.
    ///
    /// Validation and rate limiting happen before any external call. On
    /// success the completed run (results, assessments folded into the
    /// stored results, summary) is persisted and returned; on transport
    /// failure the run is persisted as `failed` and the error is returned.
    pub fn run_scan(&self, user_id: i64, request: &ScanRequest) -> Result<ScanRun, ScanError> {
        validate_target(&request.target)?;
        validate_creds(request.creds.as_ref())?;
        self.limiter.check(user_id)?;

        let mut run = ScanRun::new(user_id, &request.target);
        let ctx = ScanContext::new(&run.id, user_id, &request.target);
        log::info!(
            "{} SCAN_STARTED user_id={} target={}",
            ctx.log_context(),
            user_id,
            request.target
        );

        match self.client.scan(&request.target, request.creds.as_ref()) {
            Ok(raw_results) => {
                let report = process_results(&ctx, &raw_results);
                run.set_results(report.into_results());
                run.mark_completed();
                self.store
                    .save_run(&run)
                    .map_err(|e| ScanError::Storage(e.to_string()))?;
                Ok(run)
            }
            Err(err) => {
                run.mark_failed(&err.to_string());
                // Keep the failed run for diagnostics even though the
                // caller gets the transport error.
                if let Err(store_err) = self.store.save_run(&run) {
                    log::error!(
                        "{} FAILED_RUN_NOT_STORED error={}",
                        ctx.log_context(),
                        store_err
                    );
                }
                Err(err)
            }
        }
    }

    /// Poll the scanner for previously computed raw results.
    pub fn fetch_results(&self) -> Result<Vec<Value>, ScanError> {
        self.client.fetch_results()
    }

    /// Re-run the classification pipeline over raw results without touching
    /// the scanner (used when rendering persisted or polled data).
    pub fn classify_results(&self, scan_id: &str, user_id: i64, raw: &[Value]) -> ScanReport {
        let ctx = ScanContext::new(scan_id, user_id, "");
        process_results(&ctx, raw)
    }

    /// Fetch a stored run, scoped to its owner.
    pub fn get_run(&self, scan_id: &str, user_id: i64) -> Option<ScanRun> {
        self.store.get_run(scan_id, user_id)
    }
}
