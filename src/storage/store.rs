//! Scan persistence seam.
//!
//! The core treats persistence as a key-value-like repository keyed by scan
//! id and owner. `save_run` is all-or-nothing: a run and its results are
//! stored together or not at all.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::ScanError;
use crate::report::scan_run::ScanRun;

/// Repository for scan runs and their results.
pub trait ScanStore: Send + Sync {
    /// Persist a run with its results atomically. Saving an existing id
    /// replaces the stored run (used for terminal-state finalization).
    fn save_run(&self, run: &ScanRun) -> Result<(), ScanError>;

    /// Fetch a run, scoped to its owner.
    fn get_run(&self, scan_id: &str, user_id: i64) -> Option<ScanRun>;

    /// All runs owned by a user, most recent first.
    fn runs_for_user(&self, user_id: i64) -> Vec<ScanRun>;
}

/// In-memory store. A whole run is replaced under one write lock, which
/// gives the same all-or-nothing guarantee a transaction does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    runs: RwLock<HashMap<String, ScanRun>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScanStore for MemoryStore {
    fn save_run(&self, run: &ScanRun) -> Result<(), ScanError> {
        self.runs.write().insert(run.id.clone(), run.clone());
        Ok(())
    }

    fn get_run(&self, scan_id: &str, user_id: i64) -> Option<ScanRun> {
        self.runs
            .read()
            .get(scan_id)
            .filter(|run| run.owner_user_id == user_id)
            .cloned()
    }

    fn runs_for_user(&self, user_id: i64) -> Vec<ScanRun> {
        let mut runs: Vec<ScanRun> = self
            .runs
            .read()
            .values()
            .filter(|run| run.owner_user_id == user_id)
            .cloned()
            .collect();
        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_get() {
        let store = MemoryStore::new();
        let run = ScanRun::new(1, "10.0.0.1");
        let id = run.id.clone();

        store.save_run(&run).unwrap();
        assert!(store.get_run(&id, 1).is_some());
    }

    #[test]
    fn test_owner_scoping() {
        let store = MemoryStore::new();
        let run = ScanRun::new(1, "10.0.0.1");
        let id = run.id.clone();
        store.save_run(&run).unwrap();

        // Another user cannot see the run.
        assert!(store.get_run(&id, 2).is_none());
    }

    #[test]
    fn test_save_replaces_whole_run() {
        let store = MemoryStore::new();
        let mut run = ScanRun::new(1, "10.0.0.1");
        store.save_run(&run).unwrap();

        run.mark_failed("timeout");
        store.save_run(&run).unwrap();

        let stored = store.get_run(&run.id, 1).unwrap();
        assert_eq!(stored.error_message(), Some("timeout"));
    }

    #[test]
    fn test_runs_for_user_ordering() {
        let store = MemoryStore::new();
        let first = ScanRun::new(1, "10.0.0.1");
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = ScanRun::new(1, "10.0.0.2");
        store.save_run(&first).unwrap();
        store.save_run(&second).unwrap();

        let runs = store.runs_for_user(1);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].target, "10.0.0.2");
    }
}
