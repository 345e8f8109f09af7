//! Daily digest fan-out.

use std::{sync::Arc, time::Instant};

use {
    daylog_channels::ChannelOutbound,
    daylog_store::{MessageStore, UserLog},
    tracing::{debug, info, warn},
};

/// First line of every digest.
pub const DIGEST_HEADER: &str = "Your message history:";

/// Render a user's whole log as one message. `None` when there is nothing
/// to send.
pub fn build_digest(log: &UserLog) -> Option<String> {
    if log.is_empty() {
        return None;
    }
    let mut digest = String::from(DIGEST_HEADER);
    for text in log.texts() {
        digest.push('\n');
        digest.push_str(text);
    }
    Some(digest)
}

/// Per-cycle delivery counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Sends every user their full history. Logs are never cleared.
pub struct DigestDispatcher {
    store: Arc<dyn MessageStore>,
    outbound: Arc<dyn ChannelOutbound>,
}

impl DigestDispatcher {
    pub fn new(store: Arc<dyn MessageStore>, outbound: Arc<dyn ChannelOutbound>) -> Self {
        Self { store, outbound }
    }

    /// Run one cycle. Only a failed snapshot load is returned as an error;
    /// delivery failures are counted and logged.
    pub async fn dispatch(&self) -> daylog_store::Result<DispatchReport> {
        let started = Instant::now();
        let snapshot = self.store.load_all().await?;
        let mut report = DispatchReport::default();

        for (user_id, log) in &snapshot {
            let Some(digest) = build_digest(log) else {
                report.skipped += 1;
                continue;
            };
            match self.outbound.send_text(user_id.as_str(), &digest).await {
                Ok(()) => {
                    debug!(user_id = %user_id, entries = log.len(), "digest sent");
                    report.sent += 1;
                },
                Err(e) => {
                    warn!(user_id = %user_id, error = %e, "failed to send digest");
                    report.failed += 1;
                },
            }
        }

        info!(
            users = snapshot.len(),
            sent = report.sent,
            skipped = report.skipped,
            failed = report.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "digest cycle finished"
        );
        Ok(report)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::test_support::RecordingOutbound,
        chrono::Utc,
        daylog_store::{Entry, InMemoryStore, Snapshot, UserId, entry_count},
    };

    fn log(texts: &[&str]) -> UserLog {
        UserLog::from(
            texts
                .iter()
                .map(|t| Entry::new(*t, Utc::now()))
                .collect::<Vec<_>>(),
        )
    }

    fn seeded(users: &[(&str, &[&str])]) -> Arc<InMemoryStore> {
        let mut snapshot = Snapshot::new();
        for (user, texts) in users {
            snapshot.insert(UserId::from(*user), log(texts));
        }
        Arc::new(InMemoryStore::with_snapshot(snapshot))
    }

    #[test]
    fn digest_is_header_then_one_line_per_entry() {
        assert_eq!(
            build_digest(&log(&["a", "b", "c"])).as_deref(),
            Some("Your message history:\na\nb\nc")
        );
    }

    #[test]
    fn digest_keeps_multiline_entries() {
        assert_eq!(
            build_digest(&log(&["shopping:\n- eggs"])).as_deref(),
            Some("Your message history:\nshopping:\n- eggs")
        );
    }

    #[test]
    fn empty_log_has_no_digest() {
        assert_eq!(build_digest(&UserLog::default()), None);
    }

    #[tokio::test]
    async fn sends_each_user_their_own_log() {
        let store = seeded(&[("1", &["a"]), ("2", &["x", "y"]), ("3", &[])]);
        let outbound = Arc::new(RecordingOutbound::default());
        let dispatcher = DigestDispatcher::new(store, outbound.clone());

        let report = dispatcher.dispatch().await.unwrap();

        assert_eq!(report, DispatchReport {
            sent: 2,
            skipped: 1,
            failed: 0
        });
        assert_eq!(outbound.sent_to("1"), ["Your message history:\na"]);
        assert_eq!(outbound.sent_to("2"), ["Your message history:\nx\ny"]);
        assert!(outbound.sent_to("3").is_empty());
    }

    #[tokio::test]
    async fn recipients_are_served_in_user_id_order() {
        let store = seeded(&[("30", &["c"]), ("10", &["a"]), ("20", &["b"])]);
        let outbound = Arc::new(RecordingOutbound::default());
        let dispatcher = DigestDispatcher::new(store, outbound.clone());

        dispatcher.dispatch().await.unwrap();

        let order: Vec<_> = outbound.sent().into_iter().map(|(to, _)| to).collect();
        assert_eq!(order, ["10", "20", "30"]);
    }

    #[tokio::test]
    async fn empty_store_sends_nothing() {
        let outbound = Arc::new(RecordingOutbound::default());
        let dispatcher = DigestDispatcher::new(Arc::new(InMemoryStore::new()), outbound.clone());

        assert_eq!(
            dispatcher.dispatch().await.unwrap(),
            DispatchReport::default()
        );
        assert!(outbound.sent().is_empty());
    }

    #[tokio::test]
    async fn one_failing_recipient_does_not_stop_the_rest() {
        let store = seeded(&[("1", &["a"]), ("2", &["b"]), ("3", &["c"])]);
        let outbound = Arc::new(RecordingOutbound::failing_for(&["2"]));
        let dispatcher = DigestDispatcher::new(store, outbound.clone());

        let report = dispatcher.dispatch().await.unwrap();

        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(outbound.sent_to("1").len(), 1);
        assert_eq!(outbound.sent_to("3").len(), 1);
    }

    #[tokio::test]
    async fn repeated_cycles_resend_full_history() {
        let store = seeded(&[("42", &["buy milk"])]);
        let outbound = Arc::new(RecordingOutbound::default());
        let dispatcher = DigestDispatcher::new(store.clone(), outbound.clone());

        dispatcher.dispatch().await.unwrap();
        store
            .append(&UserId::from(42_i64), "call mom", Utc::now())
            .await
            .unwrap();
        dispatcher.dispatch().await.unwrap();

        assert_eq!(outbound.sent_to("42"), [
            "Your message history:\nbuy milk",
            "Your message history:\nbuy milk\ncall mom",
        ]);
        assert_eq!(entry_count(&store.load_all().await.unwrap()), 2);
    }

    #[tokio::test]
    async fn appends_during_dispatch_are_not_lost() {
        let store = seeded(&[("1", &["a"]), ("2", &["b"])]);
        let outbound = Arc::new(RecordingOutbound::default());
        let dispatcher = Arc::new(DigestDispatcher::new(store.clone(), outbound));
        let before = entry_count(&store.load_all().await.unwrap());

        let cycle = tokio::spawn({
            let dispatcher = Arc::clone(&dispatcher);
            async move { dispatcher.dispatch().await }
        });
        let mut writers = Vec::new();
        for i in 0..10 {
            for user in [1_i64, 2] {
                let store = Arc::clone(&store);
                writers.push(tokio::spawn(async move {
                    store
                        .append(&UserId::from(user), &format!("late-{i}"), Utc::now())
                        .await
                }));
            }
        }
        cycle.await.unwrap().unwrap();
        for writer in writers {
            writer.await.unwrap().unwrap();
        }

        assert_eq!(entry_count(&store.load_all().await.unwrap()), before + 20);
    }
}
