use async_trait::async_trait;

use crate::Result;

/// Send messages to a platform peer.
#[async_trait]
pub trait ChannelOutbound: Send + Sync {
    /// Deliver `text` to the chat identified by `to`. Long texts may be
    /// split into several platform messages by the implementation.
    async fn send_text(&self, to: &str, text: &str) -> Result<()>;
}
