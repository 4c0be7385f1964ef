#![allow(dead_code)]

use async_trait::async_trait;
use house_radar::api::{Actuator, DistanceProvider};
use house_radar::core::{ActuatorError, AudioError, HealthChecker, RoutingError, SourceError};
use house_radar::monitoring::WatchMetrics;
use house_radar::notify::{AudioPlayer, PulseSettings};
use house_radar::scanner::{ActiveHours, Listing, ListingSource, SourceSnapshot};
use house_radar::{WatchComponents, WatchOrchestrator, WatchSettings};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub enum Poll {
    Found(Listing),
    Empty,
    Fail,
}

/// Replays scripted polls, repeating the last one once the script runs out.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Poll>>,
    last: Mutex<Option<Listing>>,
    pub polls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Poll>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            polls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ListingSource for ScriptedSource {
    async fn poll(&self) -> Result<SourceSnapshot, SourceError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        let current = match next {
            Some(Poll::Found(listing)) => {
                *self.last.lock().unwrap() = Some(listing.clone());
                Some(listing)
            }
            Some(Poll::Empty) => None,
            Some(Poll::Fail) => return Err(SourceError::Status(503)),
            None => self.last.lock().unwrap().clone(),
        };
        Ok(SourceSnapshot {
            entries_found: current.iter().count(),
            current,
            server_date: Some("Mon, 19 Oct 2026 10:00:00 GMT".to_string()),
        })
    }
}

/// Distances keyed by reference address; unknown references fail.
pub struct TableRouting {
    distances: HashMap<String, f64>,
    pub requests: AtomicUsize,
}

impl TableRouting {
    pub fn new(distances: &[(&str, f64)]) -> Self {
        Self {
            distances: distances
                .iter()
                .map(|(reference, d)| (reference.to_string(), *d))
                .collect(),
            requests: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DistanceProvider for TableRouting {
    async fn distance_km(&self, _from: &str, to: &str) -> Result<f64, RoutingError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.distances
            .get(to)
            .copied()
            .ok_or(RoutingError::Status(500))
    }
}

pub struct CountingActuator {
    pub calls: AtomicUsize,
    fail: bool,
}

impl CountingActuator {
    pub fn new(fail: bool) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail,
        }
    }
}

#[async_trait]
impl Actuator for CountingActuator {
    async fn trigger(&self) -> Result<(), ActuatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ActuatorError::Status(502));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingPlayer {
    pub played: Mutex<Vec<PathBuf>>,
}

impl RecordingPlayer {
    pub fn played(&self) -> Vec<PathBuf> {
        self.played.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioPlayer for RecordingPlayer {
    async fn play(&self, path: &Path) -> Result<(), AudioError> {
        self.played.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

pub fn references() -> Vec<String> {
    vec!["A".to_string(), "B".to_string(), "C".to_string()]
}

pub fn settings(poll_interval: Duration, pulse_interval: Duration) -> WatchSettings {
    WatchSettings {
        poll_interval,
        hours: ActiveHours::new(7, 23),
        references: references(),
        near_threshold_km: 1.5,
        pulse: PulseSettings {
            count: 6,
            interval: pulse_interval,
        },
        assets_dir: PathBuf::from("assets"),
        bus_capacity: 32,
    }
}

pub struct Harness {
    pub watcher: WatchOrchestrator,
    pub health: Arc<HealthChecker>,
    pub metrics: WatchMetrics,
}

pub fn harness(settings: WatchSettings, components: WatchComponents, hour: u32) -> Harness {
    let health = Arc::new(HealthChecker::new());
    let metrics = WatchMetrics::new().unwrap();
    let watcher = WatchOrchestrator::new(settings, components, health.clone(), metrics.clone())
        .with_hour_source(Arc::new(move || hour));
    Harness {
        watcher,
        health,
        metrics,
    }
}
