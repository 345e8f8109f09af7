//! Timer loop for a single daily job.

use std::{sync::Arc, time::Duration};

use {
    chrono::{DateTime, Utc},
    tokio::{
        sync::{Mutex, Notify, RwLock},
        task::JoinHandle,
    },
    tracing::{debug, error, info, warn},
};

use crate::{Error, Result, schedule::DailySchedule};

/// Callback invoked when the job fires. Must hand the work off and return
/// without waiting for it; the timer is blocked until it returns.
pub type SubmitFn = Arc<dyn Fn(DateTime<Utc>) -> Result<()> + Send + Sync>;

/// Wall-clock source. [`Utc::now`] outside of tests.
pub type ClockFn = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Upper bound on a single sleep, so wall-clock adjustments are noticed.
const MAX_SLEEP: Duration = Duration::from_secs(60);

/// Point-in-time view of the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronStatus {
    pub running: bool,
    pub next_run_at: Option<DateTime<Utc>>,
    pub last_fired_at: Option<DateTime<Utc>>,
    pub fire_count: u64,
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct JobState {
    next_run_at: Option<DateTime<Utc>>,
    last_fired_at: Option<DateTime<Utc>>,
    fire_count: u64,
    last_error: Option<String>,
}

/// Fires `on_fire` every day at the schedule's time.
pub struct CronService {
    name: String,
    schedule: DailySchedule,
    on_fire: SubmitFn,
    clock: ClockFn,
    timer_handle: Mutex<Option<JoinHandle<()>>>,
    wake_notify: Arc<Notify>,
    running: RwLock<bool>,
    state: RwLock<JobState>,
}

impl CronService {
    pub fn new(name: impl Into<String>, schedule: DailySchedule, on_fire: SubmitFn) -> Arc<Self> {
        let clock: ClockFn = Arc::new(Utc::now);
        Self::with_clock(name, schedule, on_fire, clock)
    }

    pub fn with_clock(
        name: impl Into<String>,
        schedule: DailySchedule,
        on_fire: SubmitFn,
        clock: ClockFn,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            schedule,
            on_fire,
            clock,
            timer_handle: Mutex::new(None),
            wake_notify: Arc::new(Notify::new()),
            running: RwLock::new(false),
            state: RwLock::new(JobState::default()),
        })
    }

    pub fn schedule(&self) -> &DailySchedule {
        &self.schedule
    }

    /// Compute the first run and spawn the timer loop.
    pub async fn start(self: &Arc<Self>) -> Result<()> {
        {
            let mut running = self.running.write().await;
            if *running {
                return Err(Error::message(format!(
                    "cron job '{}' is already running",
                    self.name
                )));
            }
            *running = true;
        }

        let next = self.schedule.next_after((self.clock)());
        self.state.write().await.next_run_at = next;
        info!(
            job = %self.name,
            schedule = %self.schedule,
            next_run_at = ?next,
            "cron job scheduled"
        );

        let svc = Arc::clone(self);
        let handle = tokio::spawn(async move {
            svc.timer_loop().await;
        });
        *self.timer_handle.lock().await = Some(handle);
        Ok(())
    }

    /// Stop the timer loop.
    pub async fn stop(&self) {
        *self.running.write().await = false;
        self.wake_notify.notify_one();

        let mut handle = self.timer_handle.lock().await;
        if let Some(h) = handle.take() {
            h.abort();
        }
        info!(job = %self.name, "cron service stopped");
    }

    pub async fn status(&self) -> CronStatus {
        let state = self.state.read().await;
        CronStatus {
            running: *self.running.read().await,
            next_run_at: state.next_run_at,
            last_fired_at: state.last_fired_at,
            fire_count: state.fire_count,
            last_error: state.last_error.clone(),
        }
    }

    /// Fire immediately, outside the schedule. The next scheduled run is
    /// left as it was.
    pub async fn trigger_now(&self) -> Result<()> {
        self.fire((self.clock)()).await
    }

    async fn timer_loop(self: &Arc<Self>) {
        loop {
            if !*self.running.read().await {
                break;
            }

            let Some(next) = self.state.read().await.next_run_at else {
                warn!(job = %self.name, "no upcoming run, timer loop exiting");
                break;
            };

            let now = (self.clock)();
            if now >= next {
                // Errors are recorded in state; the job stays scheduled.
                let _ = self.fire(now).await;
                let following = self.schedule.next_after(now.max(next));
                self.state.write().await.next_run_at = following;
                debug!(job = %self.name, next_run_at = ?following, "cron job rescheduled");
                continue;
            }

            let wait = (next - now).to_std().unwrap_or_default().min(MAX_SLEEP);
            let notify = Arc::clone(&self.wake_notify);
            tokio::select! {
                () = tokio::time::sleep(wait) => {},
                () = notify.notified() => {
                    debug!("timer loop woken by notify");
                },
            }
        }
    }

    async fn fire(&self, at: DateTime<Utc>) -> Result<()> {
        info!(job = %self.name, fired_at = %at, "cron job fired");
        let result = (self.on_fire)(at);

        let mut state = self.state.write().await;
        state.fire_count += 1;
        state.last_fired_at = Some(at);
        match &result {
            Ok(()) => state.last_error = None,
            Err(e) => {
                error!(
                    job = %self.name,
                    error = %e,
                    "cron job hand-off failed, will retry at the next scheduled time"
                );
                state.last_error = Some(e.to_string());
            },
        }
        result
    }
}
