use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::listing::Listing;
use crate::core::{EventBus, HealthChecker, WatchEvent};
use crate::monitoring::WatchMetrics;

/// Owns the last accepted listing and lets a candidate through only when it
/// differs from it.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last: Option<Listing>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Listing> {
        self.last.as_ref()
    }

    pub fn accept(&mut self, candidate: Option<Listing>) -> Option<Listing> {
        let candidate = candidate.filter(|listing| !listing.address.trim().is_empty())?;
        if self.last.as_ref() == Some(&candidate) {
            return None;
        }
        self.last = Some(candidate.clone());
        Some(candidate)
    }

    /// Runs the detector as the single consumer of poll results, publishing
    /// each accepted change on the bus.
    pub fn spawn(
        mut self,
        mut candidates: mpsc::Receiver<Option<Listing>>,
        bus: Arc<EventBus>,
        health: Arc<HealthChecker>,
        metrics: WatchMetrics,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(candidate) = candidates.recv().await {
                let Some(listing) = self.accept(candidate) else {
                    continue;
                };

                let detected_at = Utc::now();
                tracing::info!(
                    "🏠 New listing: {} (repriced: {})",
                    listing.address,
                    listing.is_repriced
                );
                metrics.listings_changed.inc();
                health.record_listing(&listing, detected_at).await;
                bus.publish(WatchEvent::ListingChanged {
                    listing,
                    detected_at,
                });
            }
            tracing::debug!("Change detector input closed");
        })
    }
}
