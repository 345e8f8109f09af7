//! Process wiring: one event queue, one consumer.
//!
//! Transports and the scheduler only enqueue [`event::GatewayEvent`]s. The
//! [`event_loop::EventLoop`] consumes them, storing inbound messages in
//! arrival order and running digests in the background.

pub mod event;
pub mod event_loop;
pub mod server;

pub use {
    event::{EVENT_QUEUE_CAPACITY, EventQueue, GatewayEvent},
    event_loop::EventLoop,
    server::start_gateway,
};
