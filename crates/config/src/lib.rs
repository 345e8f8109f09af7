//! Configuration loading and validation.
//!
//! Everything comes from environment variables (optionally seeded from a
//! `.env` file by the binary). The bot token is the only required value.

pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::{Error, Result},
    loader::{load_from_env, load_with},
    schema::{DaylogConfig, ScheduleConfig, ServerConfig, TransportMode},
};
