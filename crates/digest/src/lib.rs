//! Ingestion and daily replay of per-user message logs.
//!
//! [`IngestHandler`] turns inbound events into store appends and replies.
//! [`DigestDispatcher`] reads the whole store and sends each user their
//! accumulated log.

pub mod dispatch;
pub mod ingest;

#[cfg(test)]
pub(crate) mod test_support;

pub use {
    dispatch::{DIGEST_HEADER, DigestDispatcher, DispatchReport, build_digest},
    ingest::{ACK_TEXT, INTRO_TEXT, IngestHandler, IngestOutcome},
};
