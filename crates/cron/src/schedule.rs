//! Next-run computation for a once-a-day schedule.

use std::{fmt, str::FromStr};

use {
    chrono::{DateTime, Utc},
    cron::Schedule,
};

use crate::{Error, Result};

/// Fires every day at `hour:minute` UTC.
#[derive(Debug, Clone)]
pub struct DailySchedule {
    hour: u32,
    minute: u32,
    schedule: Schedule,
}

impl DailySchedule {
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(Error::InvalidTime { hour, minute });
        }
        // The `cron` crate wants seconds first and an optional year last.
        let expr = format!("0 {minute} {hour} * * * *");
        let schedule = Schedule::from_str(&expr)?;
        Ok(Self {
            hour,
            minute,
            schedule,
        })
    }

    /// First fire time strictly after `now`.
    pub fn next_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&now).next()
    }
}

impl fmt::Display for DailySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "daily at {:02}:{:02} UTC", self.hour, self.minute)
    }
}
