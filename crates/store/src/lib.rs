//! Per-user message logs.
//!
//! Every inbound text is appended to the sender's log. The whole mapping is
//! persisted as one JSON document, see [`store_file::FileStore`].

pub mod error;
pub mod store;
pub mod store_file;
pub mod store_memory;
pub mod types;

pub use {
    error::{Error, Result},
    store::{MessageStore, get_or_create},
    store_file::FileStore,
    store_memory::InMemoryStore,
    types::{Entry, Snapshot, UserId, UserLog, entry_count},
};
