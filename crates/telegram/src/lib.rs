//! Telegram transport for daylog.
//!
//! Receives updates by long polling ([`bot::start_polling`]) or through the
//! webhook router ([`webhook::webhook_router`]), forwards them to a
//! [`daylog_channels::ChannelEventSink`], and sends replies and digests with
//! [`outbound::TelegramOutbound`].

pub mod bot;
pub mod chunk;
pub mod config;
pub mod error;
pub mod handlers;
pub mod outbound;
pub mod webhook;

pub use {
    config::TelegramConfig,
    error::{Error, Result},
    outbound::TelegramOutbound,
    webhook::webhook_router,
};
