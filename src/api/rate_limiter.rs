use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use tokio::time::{self, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Requests allowed to start within one window.
    pub max_requests: usize,
    pub window: Duration,
    /// Requests allowed to be outstanding at once.
    pub max_in_flight: usize,
}

/// Sliding-window limiter guarding the routing service. Each permit also
/// holds an in-flight slot until it is dropped.
pub struct RateLimiter {
    config: RateLimiterConfig,
    semaphore: Arc<Semaphore>,
    request_times: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(config.max_in_flight.max(1))),
            request_times: Mutex::new(VecDeque::new()),
            config,
        }
    }

    pub async fn acquire(&self) -> Result<RateLimitPermit, String> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| format!("Failed to acquire semaphore: {}", e))?;

        loop {
            let mut times = self.request_times.lock().await;
            let now = Instant::now();

            while let Some(&front) = times.front() {
                if now.duration_since(front) >= self.config.window {
                    times.pop_front();
                } else {
                    break;
                }
            }

            if times.len() < self.config.max_requests.max(1) {
                times.push_back(now);
                return Ok(RateLimitPermit {
                    _permit: permit,
                    start_time: now,
                });
            }

            let oldest = times.front().copied().unwrap_or(now);
            let wait = (oldest + self.config.window).saturating_duration_since(now);
            debug!("⏳ Routing rate limit reached, waiting {:?}", wait);
            drop(times);
            time::sleep(wait).await;
        }
    }

    pub async fn get_current_usage(&self) -> usize {
        let times = self.request_times.lock().await;
        let now = Instant::now();
        times
            .iter()
            .filter(|&&t| now.duration_since(t) < self.config.window)
            .count()
    }

    pub fn in_flight_available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

pub struct RateLimitPermit {
    _permit: tokio::sync::OwnedSemaphorePermit,
    start_time: Instant,
}

impl RateLimitPermit {
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
