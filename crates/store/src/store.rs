//! Persistence trait for message logs.

use std::collections::btree_map;

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    tracing::debug,
};

use crate::{
    Result,
    types::{Snapshot, UserId, UserLog},
};

/// Durable mapping from user identity to that user's log.
///
/// Implementations serialize every operation: two concurrent `append`
/// calls must both be visible afterwards.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append one entry to `user_id`'s log, creating the log if needed.
    /// Returns only once the entry is durable.
    async fn append(&self, user_id: &UserId, text: &str, timestamp: DateTime<Utc>) -> Result<()>;

    /// Snapshot of every log as currently stored.
    async fn load_all(&self) -> Result<Snapshot>;

    /// Replace the stored mapping with `snapshot`.
    async fn persist(&self, snapshot: &Snapshot) -> Result<()>;
}

/// Return the log for `user_id`, inserting an empty one first if the user
/// has never been seen.
pub fn get_or_create<'a>(snapshot: &'a mut Snapshot, user_id: &UserId) -> &'a mut UserLog {
    match snapshot.entry(user_id.clone()) {
        btree_map::Entry::Occupied(slot) => slot.into_mut(),
        btree_map::Entry::Vacant(slot) => {
            debug!(user_id = %user_id, "creating user log");
            slot.insert(UserLog::default())
        },
    }
}
