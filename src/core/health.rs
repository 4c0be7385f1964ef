use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::scanner::Listing;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub last_check: Option<String>,
    pub last_listing: Option<Listing>,
    pub last_listing_at: Option<DateTime<Utc>>,
    pub components: ComponentHealth,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub listing_source: bool,
    pub routing_service: bool,
    pub actuator: bool,
    pub audio: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    ListingSource,
    RoutingService,
    Actuator,
    Audio,
}

#[derive(Debug, Default)]
struct Observations {
    components: ComponentHealth,
    last_check: Option<String>,
    last_listing: Option<Listing>,
    last_listing_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct HealthChecker {
    start_time: std::time::Instant,
    state: Arc<RwLock<Observations>>,
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthChecker {
    pub fn new() -> Self {
        Self {
            start_time: std::time::Instant::now(),
            state: Arc::new(RwLock::new(Observations::default())),
        }
    }

    pub async fn get_status(&self) -> HealthStatus {
        let state = self.state.read().await;

        HealthStatus {
            status: if state.components.listing_source {
                "healthy".to_string()
            } else {
                "degraded".to_string()
            },
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            last_check: state.last_check.clone(),
            last_listing: state.last_listing.clone(),
            last_listing_at: state.last_listing_at,
            components: state.components.clone(),
        }
    }

    pub async fn update_component(&self, component: Component, healthy: bool) {
        let mut state = self.state.write().await;
        let status = &mut state.components;
        match component {
            Component::ListingSource => status.listing_source = healthy,
            Component::RoutingService => status.routing_service = healthy,
            Component::Actuator => status.actuator = healthy,
            Component::Audio => status.audio = healthy,
        }
    }

    /// Records a successful poll; `server_date` is the page's `Date` header when sent.
    pub async fn record_check(&self, server_date: Option<String>) {
        let mut state = self.state.write().await;
        state.components.listing_source = true;
        state.last_check = Some(server_date.unwrap_or_else(|| "no response date".to_string()));
    }

    pub async fn record_listing(&self, listing: &Listing, at: DateTime<Utc>) {
        let mut state = self.state.write().await;
        state.last_listing = Some(listing.clone());
        state.last_listing_at = Some(at);
    }
}
