use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::audio::{AlertAsset, AudioPlayer};
use crate::core::event_bus::next_event;
use crate::core::{Component, HealthChecker, WatchEvent};
use crate::evaluation::{EvaluationResult, Proximity};
use crate::monitoring::WatchMetrics;

/// Plays the audio alert for listings classified near a station.
#[derive(Clone)]
pub struct AlertReaction {
    player: Arc<dyn AudioPlayer>,
    assets_dir: PathBuf,
    health: Arc<HealthChecker>,
    metrics: WatchMetrics,
}

impl AlertReaction {
    pub fn new(
        player: Arc<dyn AudioPlayer>,
        assets_dir: PathBuf,
        health: Arc<HealthChecker>,
        metrics: WatchMetrics,
    ) -> Self {
        Self {
            player,
            assets_dir,
            health,
            metrics,
        }
    }

    /// Returns the asset that was played, or `None` when the listing is far,
    /// has no distance, or playback failed.
    pub async fn handle(&self, result: &EvaluationResult) -> Option<AlertAsset> {
        match result.proximity()? {
            Proximity::Far => {
                tracing::info!(
                    "{} is too far from the metro ({:.2} km), no alert",
                    result.listing.address,
                    result.min_distance_km.unwrap_or_default()
                );
                None
            }
            Proximity::Near => {
                self.metrics.near_listings.inc();
                tracing::info!("🔔 NEW HOUSE near metro FOUND! {}", result.listing.address);

                let asset = AlertAsset::for_listing(&result.listing);
                let path = asset.path_in(&self.assets_dir);
                match self.player.play(&path).await {
                    Ok(()) => {
                        self.metrics.alerts_played.inc();
                        self.health.update_component(Component::Audio, true).await;
                        Some(asset)
                    }
                    Err(e) => {
                        self.metrics.alerts_failed.inc();
                        self.health.update_component(Component::Audio, false).await;
                        tracing::error!("Error playing audio {}: {}", path.display(), e);
                        None
                    }
                }
            }
        }
    }

    /// Playback runs in its own task so a long alert never holds up the next event.
    pub fn spawn(self, mut events: broadcast::Receiver<WatchEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = next_event(&mut events, "alert reaction").await {
                let WatchEvent::ListingEvaluated { result } = event else {
                    continue;
                };

                let reaction = self.clone();
                tokio::spawn(async move {
                    reaction.handle(&result).await;
                });
            }
        })
    }
}
