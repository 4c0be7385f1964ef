use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::evaluation::EvaluationResult;
use crate::scanner::Listing;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WatchEvent {
    /// A listing that differs from the previously accepted one.
    ListingChanged {
        listing: Listing,
        detected_at: DateTime<Utc>,
    },
    /// A distance round that produced at least one valid sample.
    ListingEvaluated { result: EvaluationResult },
}

pub struct EventBus {
    sender: broadcast::Sender<WatchEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, event: WatchEvent) {
        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::debug!("📡 Event published to {} receivers", receivers);
            }
            Err(broadcast::error::SendError(event)) => {
                tracing::debug!("No subscribers for event: {:?}", event);
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WatchEvent> {
        self.sender.subscribe()
    }
}

/// Receives the next event, skipping over a lag instead of failing.
/// Returns `None` once the bus is gone.
pub async fn next_event(
    receiver: &mut broadcast::Receiver<WatchEvent>,
    subscriber: &str,
) -> Option<WatchEvent> {
    loop {
        match receiver.recv().await {
            Ok(event) => return Some(event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("{} lagged behind, skipped {} events", subscriber, skipped);
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}
