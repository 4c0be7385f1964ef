use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::api::Actuator;
use crate::core::event_bus::next_event;
use crate::core::{Component, HealthChecker, WatchEvent};
use crate::monitoring::WatchMetrics;

/// Holds at most one running timer chain; starting a new one aborts the
/// previous chain. Calls already issued by the old chain are not retracted.
#[derive(Default)]
pub struct CancelableTimer {
    current: Option<JoinHandle<()>>,
}

impl CancelableTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restart<F>(&mut self, chain: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.current = Some(tokio::spawn(chain));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.current.take() {
            if !handle.is_finished() {
                tracing::debug!("Abandoning in-flight pulse sequence");
            }
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for CancelableTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Debug, Clone)]
pub struct PulseSettings {
    pub count: u32,
    pub interval: Duration,
}

impl Default for PulseSettings {
    fn default() -> Self {
        Self {
            count: 6,
            interval: Duration::from_millis(1500),
        }
    }
}

/// Calls the actuator `count` times, one `interval` apart, starting one
/// interval after it is invoked. A failed call is logged and the sequence
/// carries on.
pub async fn pulse_sequence(
    actuator: Arc<dyn Actuator>,
    settings: PulseSettings,
    health: Arc<HealthChecker>,
    metrics: WatchMetrics,
) {
    for pulse in 1..=settings.count {
        tokio::time::sleep(settings.interval).await;
        match actuator.trigger().await {
            Ok(()) => {
                metrics.pulses_sent.inc();
                health.update_component(Component::Actuator, true).await;
                tracing::debug!("💡 Pulse {}/{} sent", pulse, settings.count);
            }
            Err(e) => {
                metrics.pulses_failed.inc();
                health.update_component(Component::Actuator, false).await;
                tracing::warn!("IOT command failed (pulse {}/{}): {}", pulse, settings.count, e);
            }
        }
    }
}

/// Pulses the actuator on every accepted listing change, independently of
/// the distance outcome.
pub struct PulseReaction {
    actuator: Arc<dyn Actuator>,
    settings: PulseSettings,
    health: Arc<HealthChecker>,
    metrics: WatchMetrics,
}

impl PulseReaction {
    pub fn new(
        actuator: Arc<dyn Actuator>,
        settings: PulseSettings,
        health: Arc<HealthChecker>,
        metrics: WatchMetrics,
    ) -> Self {
        Self {
            actuator,
            settings,
            health,
            metrics,
        }
    }

    pub fn spawn(self, mut events: broadcast::Receiver<WatchEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut timer = CancelableTimer::new();
            while let Some(event) = next_event(&mut events, "pulse reaction").await {
                let WatchEvent::ListingChanged { listing, .. } = event else {
                    continue;
                };

                tracing::info!("Starting pulse sequence for {}", listing.address);
                timer.restart(pulse_sequence(
                    self.actuator.clone(),
                    self.settings.clone(),
                    self.health.clone(),
                    self.metrics.clone(),
                ));
            }
        })
    }
}
