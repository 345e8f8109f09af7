//! Inbound message handling.

use std::sync::Arc;

use {
    chrono::Utc,
    daylog_channels::{ChannelOutbound, InboundEvent, InboundKind},
    daylog_store::{MessageStore, UserId},
    tracing::{debug, error, warn},
};

/// Reply sent after a text has been stored.
pub const ACK_TEXT: &str = "Got it! I'll remember this.";

/// Reply to `/start` and `/help`.
pub const INTRO_TEXT: &str = "Send me anything and I'll remember it! Every day at the set time, I'll send you everything you've sent me.";

/// What [`IngestHandler::handle`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Text appended to the sender's log.
    Stored,
    /// Introduction sent; nothing stored.
    Introduced,
    /// Not something we keep (unknown command, media, blank text).
    Ignored,
    /// The store rejected the append. No acknowledgment was sent.
    Failed,
}

/// Single writer of the message store.
pub struct IngestHandler {
    store: Arc<dyn MessageStore>,
    outbound: Arc<dyn ChannelOutbound>,
}

impl IngestHandler {
    pub fn new(store: Arc<dyn MessageStore>, outbound: Arc<dyn ChannelOutbound>) -> Self {
        Self { store, outbound }
    }

    pub async fn handle(&self, event: &InboundEvent) -> IngestOutcome {
        match &event.kind {
            InboundKind::Text(text) => self.remember(event, text).await,
            InboundKind::Command { name, .. } if name == "start" || name == "help" => {
                self.reply(&event.chat_id, INTRO_TEXT).await;
                IngestOutcome::Introduced
            },
            InboundKind::Command { name, .. } => {
                debug!(peer_id = %event.peer_id, command = %name, "ignoring unknown command");
                IngestOutcome::Ignored
            },
            InboundKind::Unsupported { media } => {
                debug!(peer_id = %event.peer_id, media, "ignoring unsupported message");
                IngestOutcome::Ignored
            },
        }
    }

    async fn remember(&self, event: &InboundEvent, text: &str) -> IngestOutcome {
        if text.trim().is_empty() {
            debug!(peer_id = %event.peer_id, "ignoring blank message");
            return IngestOutcome::Ignored;
        }

        let user_id = UserId::new(event.peer_id.clone());
        if let Err(e) = self.store.append(&user_id, text, Utc::now()).await {
            error!(user_id = %user_id, error = %e, "failed to store message");
            return IngestOutcome::Failed;
        }
        debug!(user_id = %user_id, len = text.len(), "message stored");

        self.reply(&event.chat_id, ACK_TEXT).await;
        IngestOutcome::Stored
    }

    async fn reply(&self, chat_id: &str, text: &str) {
        if let Err(e) = self.outbound.send_text(chat_id, text).await {
            warn!(chat_id, error = %e, "failed to send reply");
        }
    }
}
