//! Conversion of Telegram updates into platform-neutral events.

use {
    daylog_channels::{ChannelEventSink, InboundEvent, InboundKind},
    teloxide::types::{MediaKind, Message, MessageKind, Update, UpdateKind},
    tracing::debug,
};

use crate::Result;

/// Forward one update to the sink. Updates we do not handle are dropped
/// here; only a closed sink is an error.
pub async fn handle_update(update: Update, sink: &dyn ChannelEventSink) -> Result<()> {
    match update.kind {
        UpdateKind::Message(msg) => match inbound_event(&msg) {
            Some(event) => {
                debug!(
                    chat_id = msg.chat.id.0,
                    peer_id = %event.peer_id,
                    "received telegram message"
                );
                sink.dispatch(event).await?;
            },
            None => debug!(chat_id = msg.chat.id.0, "ignoring message without a user sender"),
        },
        other => debug!("ignoring non-message update: {other:?}"),
    }
    Ok(())
}

/// Map a message to an [`InboundEvent`]. `None` for messages that have no
/// human sender (channel posts, other bots).
pub fn inbound_event(msg: &Message) -> Option<InboundEvent> {
    let user = msg.from.as_ref().filter(|u| !u.is_bot)?;
    let kind = match &msg.kind {
        MessageKind::Common(common) => match &common.media_kind {
            MediaKind::Text(t) => InboundKind::from_text(&t.text),
            other => InboundKind::Unsupported {
                media: media_name(other),
            },
        },
        _ => InboundKind::Unsupported { media: "service" },
    };
    Some(InboundEvent {
        peer_id: user.id.0.to_string(),
        chat_id: msg.chat.id.0.to_string(),
        kind,
    })
}

fn media_name(media: &MediaKind) -> &'static str {
    match media {
        MediaKind::Animation(_) => "animation",
        MediaKind::Audio(_) => "audio",
        MediaKind::Contact(_) => "contact",
        MediaKind::Document(_) => "document",
        MediaKind::Location(_) => "location",
        MediaKind::Photo(_) => "photo",
        MediaKind::Poll(_) => "poll",
        MediaKind::Sticker(_) => "sticker",
        MediaKind::Venue(_) => "venue",
        MediaKind::Video(_) => "video",
        MediaKind::VideoNote(_) => "video_note",
        MediaKind::Voice(_) => "voice",
        _ => "other",
    }
}
