//! Daily wall-clock scheduler.
//!
//! A [`service::CronService`] owns one timer task. When the configured UTC
//! time is reached it hands the job to a submit callback and goes back to
//! sleep; the callback decides where the work actually runs.

pub mod error;
pub mod schedule;
pub mod service;

pub use {
    error::{Error, Result},
    schedule::DailySchedule,
    service::{ClockFn, CronService, CronStatus, SubmitFn},
};
