use std::sync::Arc;
use tokio::sync::mpsc;

use super::listing::Listing;
use super::listing_source::ListingSource;
use crate::core::{Component, HealthChecker};
use crate::monitoring::WatchMetrics;

/// Runs one poll of the listing page per admitted tick and forwards the
/// current listing, if any, to the change detector.
#[derive(Clone)]
pub struct ListingPoller {
    source: Arc<dyn ListingSource>,
    candidates: mpsc::Sender<Option<Listing>>,
    health: Arc<HealthChecker>,
    metrics: WatchMetrics,
}

impl ListingPoller {
    pub fn new(
        source: Arc<dyn ListingSource>,
        candidates: mpsc::Sender<Option<Listing>>,
        health: Arc<HealthChecker>,
        metrics: WatchMetrics,
    ) -> Self {
        Self {
            source,
            candidates,
            health,
            metrics,
        }
    }

    /// A failed poll is logged and produces no candidate.
    pub async fn poll_once(&self) {
        let snapshot = match self.source.poll().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.metrics.polls_failed.inc();
                self.health.update_component(Component::ListingSource, false).await;
                tracing::warn!("Listing poll failed: {}", e);
                return;
            }
        };

        self.health.record_check(snapshot.server_date.clone()).await;
        let checked_at = snapshot.server_date.as_deref().unwrap_or("no response date");

        match &snapshot.current {
            Some(listing) => tracing::info!(
                "Check done at {}, latest known house: {}",
                checked_at,
                listing.address
            ),
            None => tracing::info!("Check done at {}, no listing with an address found", checked_at),
        }
        tracing::debug!("{} listing entries extracted", snapshot.entries_found);

        if self.candidates.send(snapshot.current).await.is_err() {
            tracing::warn!("Change detector is gone, dropping poll result");
        }
    }
}
