use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::DistanceProvider;
use crate::core::event_bus::next_event;
use crate::core::{Component, EventBus, HealthChecker, WatchEvent};
use crate::monitoring::WatchMetrics;
use crate::scanner::Listing;

pub const DEFAULT_NEAR_THRESHOLD_KM: f64 = 1.5;

/// Outcome of one routing request within a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceSample {
    pub reference: String,
    pub distance_km: Option<f64>,
}

impl DistanceSample {
    pub fn valid(reference: impl Into<String>, distance_km: f64) -> Self {
        Self {
            reference: reference.into(),
            distance_km: Some(distance_km),
        }
    }

    pub fn invalid(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            distance_km: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.distance_km, Some(d) if d.is_finite() && d >= 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Proximity {
    Near,
    Far,
}

/// Inclusive-near: exactly `threshold_km` counts as near.
pub fn classify(distance_km: f64, threshold_km: f64) -> Proximity {
    if distance_km <= threshold_km {
        Proximity::Near
    } else {
        Proximity::Far
    }
}

pub fn min_valid_distance(samples: &[DistanceSample]) -> Option<f64> {
    samples
        .iter()
        .filter(|s| s.is_valid())
        .filter_map(|s| s.distance_km)
        .reduce(f64::min)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub round_id: Uuid,
    pub listing: Listing,
    /// `None` when no sample in the round was valid.
    pub min_distance_km: Option<f64>,
    pub nearest_reference: Option<String>,
    pub samples: usize,
    pub valid_samples: usize,
    pub threshold_km: f64,
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationResult {
    pub fn proximity(&self) -> Option<Proximity> {
        self.min_distance_km
            .map(|distance| classify(distance, self.threshold_km))
    }

    pub fn is_near(&self) -> bool {
        self.proximity() == Some(Proximity::Near)
    }
}

/// Fans a listing out to every reference address and folds the settled
/// samples into one result.
pub struct DistanceEvaluator {
    provider: Arc<dyn DistanceProvider>,
    references: Vec<String>,
    threshold_km: f64,
    health: Arc<HealthChecker>,
    metrics: WatchMetrics,
}

impl DistanceEvaluator {
    pub fn new(
        provider: Arc<dyn DistanceProvider>,
        references: Vec<String>,
        threshold_km: f64,
        health: Arc<HealthChecker>,
        metrics: WatchMetrics,
    ) -> Self {
        Self {
            provider,
            references,
            threshold_km,
            health,
            metrics,
        }
    }

    async fn sample(&self, origin: &str, reference: &str) -> DistanceSample {
        match self.provider.distance_km(origin, reference).await {
            Ok(distance) if distance.is_finite() && distance >= 0.0 => {
                tracing::debug!("{:.3} km to {}", distance, reference);
                DistanceSample::valid(reference, distance)
            }
            Ok(distance) => {
                self.metrics.routing_samples_failed.inc();
                tracing::debug!("Discarding distance {} to {}", distance, reference);
                DistanceSample::invalid(reference)
            }
            Err(e) => {
                self.metrics.routing_samples_failed.inc();
                tracing::debug!("Distance to {} unavailable: {}", reference, e);
                DistanceSample::invalid(reference)
            }
        }
    }

    /// Issues every request at once and returns only after all of them settled.
    pub async fn evaluate(&self, listing: &Listing) -> EvaluationResult {
        let round_id = Uuid::new_v4();
        tracing::info!("Checking addresses...");

        let samples = join_all(
            self.references
                .iter()
                .map(|reference| self.sample(&listing.address, reference)),
        )
        .await;

        let valid_samples = samples.iter().filter(|s| s.is_valid()).count();
        let min_distance_km = min_valid_distance(&samples);
        let nearest_reference = min_distance_km.and_then(|min| {
            samples
                .iter()
                .find(|s| s.is_valid() && s.distance_km == Some(min))
                .map(|s| s.reference.clone())
        });

        self.metrics.rounds_completed.inc();
        self.health
            .update_component(Component::RoutingService, valid_samples > 0)
            .await;

        EvaluationResult {
            round_id,
            listing: listing.clone(),
            min_distance_km,
            nearest_reference,
            samples: samples.len(),
            valid_samples,
            threshold_km: self.threshold_km,
            evaluated_at: Utc::now(),
        }
    }

    /// Evaluates every accepted listing in arrival order and publishes rounds
    /// that produced a distance.
    pub fn spawn(
        self,
        mut events: broadcast::Receiver<WatchEvent>,
        bus: Arc<EventBus>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = next_event(&mut events, "distance evaluator").await {
                let WatchEvent::ListingChanged { listing, .. } = event else {
                    continue;
                };

                let span = tracing::info_span!("round", address = %listing.address);
                let result = self.evaluate(&listing).instrument(span).await;

                match result.min_distance_km {
                    None => {
                        self.metrics.rounds_without_distance.inc();
                        tracing::warn!(
                            "Couldn't calculate distance for {} ({} requests failed)",
                            listing.address,
                            result.samples
                        );
                    }
                    Some(min) => {
                        tracing::info!(
                            "Minimum distance from a metro station: {} km ({}/{} samples valid, nearest: {})",
                            min,
                            result.valid_samples,
                            result.samples,
                            result.nearest_reference.as_deref().unwrap_or("?")
                        );
                        bus.publish(WatchEvent::ListingEvaluated { result });
                    }
                }
            }
        })
    }
}
