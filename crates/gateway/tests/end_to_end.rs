//! Event queue to store to outbound, without a real platform.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use {
    async_trait::async_trait,
    daylog_channels::{ChannelEventSink, ChannelOutbound, InboundEvent},
    daylog_cron::{CronService, DailySchedule},
    daylog_digest::{ACK_TEXT, INTRO_TEXT},
    daylog_gateway::{EVENT_QUEUE_CAPACITY, EventLoop, EventQueue},
    daylog_store::{FileStore, InMemoryStore, MessageStore, UserId, entry_count},
    tempfile::TempDir,
    tokio::task::JoinHandle,
    tokio_util::sync::CancellationToken,
};

#[derive(Default)]
struct RecordingOutbound {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingOutbound {
    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    async fn wait_for(&self, count: usize) {
        for _ in 0..500 {
            if self.sent.lock().unwrap().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {count} sends, got {:?}", self.sent());
    }
}

#[async_trait]
impl ChannelOutbound for RecordingOutbound {
    async fn send_text(&self, to: &str, text: &str) -> daylog_channels::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), text.to_string()));
        Ok(())
    }
}

struct Harness {
    queue: EventQueue,
    store: Arc<dyn MessageStore>,
    outbound: Arc<RecordingOutbound>,
    cancel: CancellationToken,
    event_loop: JoinHandle<()>,
}

impl Harness {
    fn start(store: Arc<dyn MessageStore>) -> Self {
        let outbound = Arc::new(RecordingOutbound::default());
        let (queue, rx) = EventQueue::channel(EVENT_QUEUE_CAPACITY);
        let cancel = CancellationToken::new();
        let event_loop = tokio::spawn(
            EventLoop::new(Arc::clone(&store), outbound.clone()).run(rx, cancel.clone()),
        );
        Self {
            queue,
            store,
            outbound,
            cancel,
            event_loop,
        }
    }

    async fn send(&self, user: &str, text: &str) {
        self.queue
            .dispatch(InboundEvent::text(user, user, text))
            .await
            .unwrap();
    }

    async fn stop(self) {
        self.cancel.cancel();
        self.event_loop.await.unwrap();
    }
}

#[tokio::test]
async fn user_42_gets_full_history_at_fire_time() {
    let tmp = TempDir::new().unwrap();
    let store = Arc::new(FileStore::new(tmp.path().join("messages.json")));
    let h = Harness::start(store);

    h.send("42", "buy milk").await;
    h.outbound.wait_for(1).await;
    assert_eq!(h.outbound.sent()[0], ("42".to_string(), ACK_TEXT.to_string()));

    h.send("42", "call mom").await;
    h.outbound.wait_for(2).await;

    let cron = CronService::new(
        "daily-digest",
        DailySchedule::new(18, 0).unwrap(),
        h.queue.digest_trigger(),
    );
    cron.trigger_now().await.unwrap();
    h.outbound.wait_for(3).await;

    assert_eq!(
        h.outbound.sent()[2],
        (
            "42".to_string(),
            "Your message history:\nbuy milk\ncall mom".to_string()
        )
    );

    // Sending does not clear anything.
    let snapshot = h.store.load_all().await.unwrap();
    assert_eq!(snapshot[&UserId::from(42_i64)].len(), 2);
    h.stop().await;
}

#[tokio::test]
async fn start_command_touches_no_log() {
    let h = Harness::start(Arc::new(InMemoryStore::new()));

    h.send("42", "/start").await;
    h.outbound.wait_for(1).await;

    assert_eq!(h.outbound.sent()[0].1, INTRO_TEXT);
    assert!(h.store.load_all().await.unwrap().is_empty());
    h.stop().await;
}

#[tokio::test]
async fn ingestion_continues_while_digest_runs() {
    let tmp = TempDir::new().unwrap();
    let h = Harness::start(Arc::new(FileStore::new(tmp.path().join("messages.json"))));

    for user in ["1", "2"] {
        h.send(user, "first").await;
    }
    h.outbound.wait_for(2).await;
    let before = entry_count(&h.store.load_all().await.unwrap());

    let trigger = h.queue.digest_trigger();
    trigger(chrono::Utc::now()).unwrap();
    for i in 0..10 {
        for user in ["1", "2"] {
            h.send(user, &format!("during-{i}")).await;
        }
    }

    // 2 first acks + 20 acks + 2 digests.
    h.outbound.wait_for(24).await;
    let snapshot = h.store.load_all().await.unwrap();
    assert_eq!(entry_count(&snapshot), before + 20);
    for user in [1_i64, 2] {
        let texts: Vec<_> = snapshot[&UserId::from(user)].texts().collect();
        assert_eq!(texts[0], "first");
        assert_eq!(texts.last().copied(), Some("during-9"));
    }
    h.stop().await;
}

#[tokio::test]
async fn queued_events_are_handled_on_shutdown() {
    let store: Arc<dyn MessageStore> = Arc::new(InMemoryStore::new());
    let outbound = Arc::new(RecordingOutbound::default());
    let (queue, rx) = EventQueue::channel(8);
    for text in ["a", "b", "c"] {
        queue
            .dispatch(InboundEvent::text("42", "42", text))
            .await
            .unwrap();
    }

    let cancel = CancellationToken::new();
    cancel.cancel();
    EventLoop::new(Arc::clone(&store), outbound.clone())
        .run(rx, cancel)
        .await;

    let snapshot = store.load_all().await.unwrap();
    let texts: Vec<_> = snapshot[&UserId::from(42_i64)].texts().collect();
    assert_eq!(texts, ["a", "b", "c"]);
    assert_eq!(outbound.sent().len(), 3);
}

#[tokio::test]
async fn scheduler_survives_stopped_event_loop() {
    let h = Harness::start(Arc::new(InMemoryStore::new()));
    let cron = CronService::new(
        "daily-digest",
        DailySchedule::new(18, 0).unwrap(),
        h.queue.digest_trigger(),
    );
    cron.start().await.unwrap();

    h.stop().await;
    assert!(cron.trigger_now().await.is_err());

    let status = cron.status().await;
    assert!(status.running);
    assert!(status.next_run_at.is_some());
    assert!(status.last_error.is_some());
    cron.stop().await;
}
