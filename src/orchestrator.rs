use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::{Actuator, DistanceProvider, HttpActuator, MapQuestClient};
use crate::core::{Config, EventBus, HealthChecker};
use crate::evaluation::{DistanceEvaluator, ReferenceSet};
use crate::monitoring::WatchMetrics;
use crate::notify::{
    AlertReaction, AudioPlayer, CommandPlayer, PulseReaction, PulseSettings, UnavailablePlayer,
};
use crate::scanner::schedule::HourSource;
use crate::scanner::{ActiveHours, ChangeDetector, GatedSchedule, HtmlListingSource, ListingPoller, ListingSource};

/// The external collaborators the pipeline talks to.
pub struct WatchComponents {
    pub source: Arc<dyn ListingSource>,
    pub routing: Arc<dyn DistanceProvider>,
    pub actuator: Arc<dyn Actuator>,
    pub player: Arc<dyn AudioPlayer>,
}

impl WatchComponents {
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = HtmlListingSource::new(&config.source).context("building listing source")?;
        let routing = MapQuestClient::new(&config.routing).context("building routing client")?;
        let actuator = HttpActuator::new(&config.actuator).context("building actuator client")?;
        let player = audio_player(config);

        Ok(Self {
            source: Arc::new(source),
            routing: Arc::new(routing),
            actuator: Arc::new(actuator),
            player,
        })
    }
}

#[cfg(feature = "rodio-playback")]
fn audio_player(config: &Config) -> Arc<dyn AudioPlayer> {
    if config.audio.player.is_none() {
        tracing::info!("🔊 Audio alerts via rodio");
        return Arc::new(crate::notify::RodioPlayer);
    }
    command_player(config)
}

#[cfg(not(feature = "rodio-playback"))]
fn audio_player(config: &Config) -> Arc<dyn AudioPlayer> {
    command_player(config)
}

/// A missing player only silences alerts; polling and pulses still run.
fn command_player(config: &Config) -> Arc<dyn AudioPlayer> {
    match CommandPlayer::from_config(config.audio.player.as_deref()) {
        Ok(player) => {
            tracing::info!("🔊 Audio alerts via `{}`", player.program());
            Arc::new(player)
        }
        Err(e) => {
            tracing::warn!("{}; set AUDIO_PLAYER to enable audio alerts", e);
            Arc::new(UnavailablePlayer)
        }
    }
}

#[derive(Debug, Clone)]
pub struct WatchSettings {
    pub poll_interval: Duration,
    pub hours: ActiveHours,
    pub references: Vec<String>,
    pub near_threshold_km: f64,
    pub pulse: PulseSettings,
    pub assets_dir: PathBuf,
    pub bus_capacity: usize,
}

impl WatchSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        let references = match &config.routing.reference_addresses_file {
            Some(path) => ReferenceSet::from_json_file(path)?,
            None => ReferenceSet::default(),
        };

        Ok(Self {
            poll_interval: config.source.poll_interval(),
            hours: ActiveHours::new(
                config.source.active_after_hour,
                config.source.active_until_hour,
            ),
            references: references.all(),
            near_threshold_km: config.routing.near_threshold_km,
            pulse: PulseSettings {
                count: config.actuator.pulse_count,
                interval: config.actuator.pulse_interval(),
            },
            assets_dir: config.audio.assets_dir.clone(),
            bus_capacity: config.monitoring.event_bus_capacity,
        })
    }
}

/// Wires scheduler, poller, change detector, evaluator and both reactions
/// together over the event bus.
pub struct WatchOrchestrator {
    settings: WatchSettings,
    components: WatchComponents,
    bus: Arc<EventBus>,
    health: Arc<HealthChecker>,
    metrics: WatchMetrics,
    hour_source: Option<HourSource>,
    handles: Vec<JoinHandle<()>>,
}

impl WatchOrchestrator {
    pub fn new(
        settings: WatchSettings,
        components: WatchComponents,
        health: Arc<HealthChecker>,
        metrics: WatchMetrics,
    ) -> Self {
        Self {
            bus: Arc::new(EventBus::new(settings.bus_capacity)),
            settings,
            components,
            health,
            metrics,
            hour_source: None,
            handles: Vec::new(),
        }
    }

    pub fn with_hour_source(mut self, hour_source: HourSource) -> Self {
        self.hour_source = Some(hour_source);
        self
    }

    pub fn is_running(&self) -> bool {
        !self.handles.is_empty() && self.handles.iter().all(|h| !h.is_finished())
    }

    pub fn start(&mut self) {
        tracing::info!(
            "🚀 Watching listings every {:?} against {} reference addresses",
            self.settings.poll_interval,
            self.settings.references.len()
        );

        // subscribers first so the first accepted listing reaches everyone
        let pulse = PulseReaction::new(
            self.components.actuator.clone(),
            self.settings.pulse.clone(),
            self.health.clone(),
            self.metrics.clone(),
        )
        .spawn(self.bus.subscribe());

        let alerts = AlertReaction::new(
            self.components.player.clone(),
            self.settings.assets_dir.clone(),
            self.health.clone(),
            self.metrics.clone(),
        )
        .spawn(self.bus.subscribe());

        let evaluator = DistanceEvaluator::new(
            self.components.routing.clone(),
            self.settings.references.clone(),
            self.settings.near_threshold_km,
            self.health.clone(),
            self.metrics.clone(),
        )
        .spawn(self.bus.subscribe(), self.bus.clone());

        let (candidates_tx, candidates_rx) = mpsc::channel(16);
        let detector = ChangeDetector::new().spawn(
            candidates_rx,
            self.bus.clone(),
            self.health.clone(),
            self.metrics.clone(),
        );

        let poller = ListingPoller::new(
            self.components.source.clone(),
            candidates_tx,
            self.health.clone(),
            self.metrics.clone(),
        );
        let mut schedule = GatedSchedule::new(self.settings.poll_interval, self.settings.hours);
        if let Some(hour_source) = &self.hour_source {
            schedule = schedule.with_hour_source(hour_source.clone());
        }
        let ticker = schedule.spawn(self.metrics.clone(), move || {
            let poller = poller.clone();
            async move { poller.poll_once().await }
        });

        self.handles
            .extend([pulse, alerts, evaluator, detector, ticker]);
        tracing::info!("✅ Listing watcher started");
    }

    pub fn shutdown(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        tracing::info!("Listing watcher stopped");
    }
}

impl Drop for WatchOrchestrator {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}
