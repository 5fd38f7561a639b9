//! Structured logging utilities.
//!
//! Provides context-aware logging with scan_id and target included
//! in every log message.

use std::fmt;

/// Logging context for a scan run.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub scan_id: String,
    pub target: Option<String>,
}

impl LogContext {
    pub fn new(scan_id: &str) -> Self {
        Self {
            scan_id: scan_id.to_string(),
            target: None,
        }
    }

    pub fn with_target(&self, target: &str) -> Self {
        Self {
            scan_id: self.scan_id.clone(),
            target: Some(target.to_string()),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(t) => write!(f, "[scan={}] [target={}]", self.scan_id, t),
            None => write!(f, "[scan={}]", self.scan_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_context_display() {
        let ctx = LogContext::new("scan-123");
        assert_eq!(format!("{}", ctx), "[scan=scan-123]");

        let ctx_with_target = ctx.with_target("192.168.1.10:1883");
        assert_eq!(
            format!("{}", ctx_with_target),
            "[scan=scan-123] [target=192.168.1.10:1883]"
        );
    }
}
