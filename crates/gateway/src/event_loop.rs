use std::sync::Arc;

use {
    daylog_channels::ChannelOutbound,
    daylog_digest::{DigestDispatcher, IngestHandler},
    daylog_store::MessageStore,
    tokio::{sync::mpsc, task::JoinSet},
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info, warn},
};

use crate::event::GatewayEvent;

/// Single consumer of the event queue.
pub struct EventLoop {
    ingest: IngestHandler,
    dispatcher: Arc<DigestDispatcher>,
}

impl EventLoop {
    pub fn new(store: Arc<dyn MessageStore>, outbound: Arc<dyn ChannelOutbound>) -> Self {
        Self {
            ingest: IngestHandler::new(Arc::clone(&store), Arc::clone(&outbound)),
            dispatcher: Arc::new(DigestDispatcher::new(store, outbound)),
        }
    }

    /// Consume events until `cancel` fires or every producer is gone.
    ///
    /// Inbound events are handled one at a time, so a user's entries are
    /// stored in the order they arrived. Digests run as separate tasks and
    /// do not hold up ingestion. On exit, events already queued are still
    /// handled and running digests are awaited.
    pub async fn run(self, mut rx: mpsc::Receiver<GatewayEvent>, cancel: CancellationToken) {
        let mut digests = JoinSet::new();
        info!("event loop started");

        loop {
            let event = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                event = rx.recv() => event,
            };
            let Some(event) = event else {
                debug!("all event producers dropped");
                break;
            };
            self.handle(event, &mut digests).await;

            while let Some(done) = digests.try_join_next() {
                if let Err(e) = done {
                    error!(error = %e, "digest task panicked");
                }
            }
        }

        rx.close();
        let mut drained = 0_usize;
        while let Ok(event) = rx.try_recv() {
            self.handle(event, &mut digests).await;
            drained += 1;
        }
        if drained > 0 {
            info!(drained, "handled queued events during shutdown");
        }
        while let Some(done) = digests.join_next().await {
            if let Err(e) = done {
                error!(error = %e, "digest task panicked");
            }
        }
        info!("event loop stopped");
    }

    async fn handle(&self, event: GatewayEvent, digests: &mut JoinSet<()>) {
        match event {
            GatewayEvent::Inbound(inbound) => {
                let outcome = self.ingest.handle(&inbound).await;
                debug!(peer_id = %inbound.peer_id, ?outcome, "inbound event handled");
            },
            GatewayEvent::RunDigest { fired_at } => {
                info!(%fired_at, "starting digest cycle");
                let dispatcher = Arc::clone(&self.dispatcher);
                digests.spawn(async move {
                    if let Err(e) = dispatcher.dispatch().await {
                        warn!(error = %e, "digest cycle aborted: could not load message store");
                    }
                });
            },
        }
    }
}
