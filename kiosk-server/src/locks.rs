//! Per-student serialization
//!
//! Orders and payment confirmations are read-then-write sequences against a
//! store with no transactions. Holding the student's lock across the whole
//! sequence keeps two requests for the same student in this process from
//! interleaving. Writers in other processes (or edits made directly in the
//! spreadsheet) are not covered.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Clone, Default)]
pub struct StudentLocks {
    inner: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl StudentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `student_id`
    pub async fn acquire(&self, student_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .inner
            .entry(student_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop locks nobody holds or waits on
    pub fn prune(&self) {
        self.inner.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
