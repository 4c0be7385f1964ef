use chrono::{Local, Timelike};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::monitoring::WatchMetrics;

/// Hours of the day in which the listing page may be polled:
/// `after_hour < hour <= until_hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveHours {
    pub after_hour: u32,
    pub until_hour: u32,
}

impl ActiveHours {
    pub fn new(after_hour: u32, until_hour: u32) -> Self {
        Self {
            after_hour,
            until_hour,
        }
    }

    pub fn admits(&self, hour: u32) -> bool {
        self.after_hour < hour && hour <= self.until_hour
    }
}

pub type HourSource = Arc<dyn Fn() -> u32 + Send + Sync>;

pub fn local_hour() -> u32 {
    Local::now().hour()
}

/// Fixed-period ticker whose ticks are dropped outside the active hours.
/// The first tick fires immediately.
pub struct GatedSchedule {
    period: Duration,
    hours: ActiveHours,
    hour_source: HourSource,
}

impl GatedSchedule {
    pub fn new(period: Duration, hours: ActiveHours) -> Self {
        Self {
            period,
            hours,
            hour_source: Arc::new(local_hour),
        }
    }

    pub fn with_hour_source(mut self, hour_source: HourSource) -> Self {
        self.hour_source = hour_source;
        self
    }

    /// Evaluated per tick so the gate follows the wall clock across the boundary.
    pub fn is_open(&self) -> bool {
        self.hours.admits((self.hour_source)())
    }

    /// Spawns the ticker. Each admitted tick runs `on_tick` in its own task,
    /// so a slow or panicking poll never stalls or kills the schedule.
    pub fn spawn<F, Fut>(self, metrics: WatchMetrics, on_tick: F) -> JoinHandle<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                if !self.is_open() {
                    metrics.ticks_gated.inc();
                    tracing::trace!("Tick outside active hours, skipped");
                    continue;
                }

                metrics.ticks_admitted.inc();
                let poll = tokio::spawn(on_tick());
                tokio::spawn(async move {
                    if let Err(e) = poll.await {
                        if e.is_panic() {
                            tracing::error!("Poll task panicked: {}", e);
                        }
                    }
                });
            }
        })
    }
}
