//! Messaging-platform seam.
//!
//! Transports turn platform updates into [`InboundEvent`]s, hand them to a
//! [`ChannelEventSink`] and implement [`ChannelOutbound`] for replies and
//! digests. Nothing here knows about a
//! specific platform.

pub mod error;
pub mod event;
pub mod outbound;
pub mod sink;

pub use {
    error::{Error, Result},
    event::{InboundEvent, InboundKind},
    outbound::ChannelOutbound,
    sink::ChannelEventSink,
};
