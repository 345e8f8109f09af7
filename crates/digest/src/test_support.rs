use std::{collections::HashSet, sync::Mutex};

use {
    async_trait::async_trait,
    daylog_channels::{ChannelOutbound, Error, Result},
};

/// Records every send; recipients in `failing` get an error instead.
#[derive(Default)]
pub(crate) struct RecordingOutbound {
    sent: Mutex<Vec<(String, String)>>,
    failing: HashSet<String>,
}

impl RecordingOutbound {
    pub(crate) fn failing_for(recipients: &[&str]) -> Self {
        Self {
            sent: Mutex::default(),
            failing: recipients.iter().map(|r| (*r).to_string()).collect(),
        }
    }

    #[allow(clippy::unwrap_used)]
    pub(crate) fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn sent_to(&self, to: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(recipient, _)| recipient == to)
            .map(|(_, text)| text)
            .collect()
    }
}

#[async_trait]
impl ChannelOutbound for RecordingOutbound {
    #[allow(clippy::unwrap_used)]
    async fn send_text(&self, to: &str, text: &str) -> Result<()> {
        if self.failing.contains(to) {
            return Err(Error::unavailable(format!("peer {to} blocked the bot")));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), text.to_string()));
        Ok(())
    }
}
