//! In-memory store for tests.

use std::sync::atomic::{AtomicBool, Ordering};

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    tokio::sync::Mutex,
};

use crate::{
    Error, Result,
    store::{MessageStore, get_or_create},
    types::{Entry, Snapshot, UserId},
};

/// `BTreeMap`-backed store. No persistence.
///
/// Writes can be made to fail with [`InMemoryStore::fail_writes`] to
/// exercise error paths in callers.
pub struct InMemoryStore {
    logs: Mutex<Snapshot>,
    fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            logs: Mutex::new(Snapshot::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            logs: Mutex::new(snapshot),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::message("in-memory store is read-only"));
        }
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for InMemoryStore {
    async fn append(&self, user_id: &UserId, text: &str, timestamp: DateTime<Utc>) -> Result<()> {
        let mut logs = self.logs.lock().await;
        self.check_writable()?;
        get_or_create(&mut logs, user_id).push(Entry::new(text, timestamp));
        Ok(())
    }

    async fn load_all(&self) -> Result<Snapshot> {
        Ok(self.logs.lock().await.clone())
    }

    async fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        let mut logs = self.logs.lock().await;
        self.check_writable()?;
        *logs = snapshot.clone();
        Ok(())
    }
}
