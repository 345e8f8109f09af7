use async_trait::async_trait;

use crate::{Result, event::InboundEvent};

/// Where transports deliver inbound events.
///
/// Implementations queue the event and return; processing happens on the
/// consumer side. An error means the consumer is gone and the event was
/// dropped.
#[async_trait]
pub trait ChannelEventSink: Send + Sync {
    async fn dispatch(&self, event: InboundEvent) -> Result<()>;
}
