//! Per-user scan rate limiting.
//!
//! Fixed-window counter: a bounded number of scans per rolling window per
//! user, checked before the external scanner call. Requests beyond the limit
//! are rejected immediately with a retry-after hint, never queued.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::ScanError;

/// Default: 10 scans per minute per user.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window rate limiter keyed by user id.
#[derive(Debug)]
pub struct RateLimiter {
    max_attempts: u32,
    window: Duration,
    windows: Mutex<HashMap<i64, Window>>,
}

impl RateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Record an attempt for a user, rejecting it if the window is full.
    pub fn check(&self, user_id: i64) -> Result<(), ScanError> {
        let now = Instant::now();
        let mut windows = self.windows.lock();

        let window = windows.entry(user_id).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }

        if window.count >= self.max_attempts {
            let elapsed = now.duration_since(window.started);
            let retry_after_secs = self.window.saturating_sub(elapsed).as_secs().max(1);
            log::warn!(
                "RATE_LIMITED user_id={} attempts={} retry_after={}s",
                user_id,
                window.count,
                retry_after_secs
            );
            return Err(ScanError::RateLimited { retry_after_secs });
        }

        window.count += 1;
        Ok(())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW)
    }
}
