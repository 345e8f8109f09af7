use std::sync::Arc;

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    daylog_channels::{ChannelEventSink, Error as ChannelError, InboundEvent},
    daylog_cron::SubmitFn,
    tokio::sync::mpsc,
};

/// Events buffered before transports start waiting for room.
pub const EVENT_QUEUE_CAPACITY: usize = 1024;

/// Work items for the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    /// A message from the platform.
    Inbound(InboundEvent),
    /// The scheduler fired.
    RunDigest { fired_at: DateTime<Utc> },
}

/// Producer side of the event queue.
#[derive(Clone)]
pub struct EventQueue {
    tx: mpsc::Sender<GatewayEvent>,
}

impl EventQueue {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<GatewayEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Scheduler callback. Never waits: a full or closed queue is reported
    /// back to the scheduler as a failed hand-off.
    pub fn digest_trigger(&self) -> SubmitFn {
        let tx = self.tx.clone();
        Arc::new(move |fired_at| {
            tx.try_send(GatewayEvent::RunDigest { fired_at })
                .map_err(|e| daylog_cron::Error::handoff(e.to_string()))
        })
    }
}

#[async_trait]
impl ChannelEventSink for EventQueue {
    async fn dispatch(&self, event: InboundEvent) -> daylog_channels::Result<()> {
        self.tx
            .send(GatewayEvent::Inbound(event))
            .await
            .map_err(|_| ChannelError::unavailable("event loop is not running"))
    }
}
