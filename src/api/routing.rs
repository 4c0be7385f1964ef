use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::rate_limiter::{RateLimiter, RateLimiterConfig};
use super::types::RouteResponse;
use crate::core::config::RoutingConfig;
use crate::core::RoutingError;

/// Point-to-point walking distance lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DistanceProvider: Send + Sync {
    async fn distance_km(&self, from: &str, to: &str) -> Result<f64, RoutingError>;
}

pub struct MapQuestClient {
    client: Client,
    base_url: String,
    api_key: String,
    limiter: RateLimiter,
}

impl MapQuestClient {
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            limiter: RateLimiter::new(RateLimiterConfig {
                max_requests: config.max_requests_per_sec,
                window: Duration::from_secs(1),
                max_in_flight: config.max_in_flight,
            }),
        })
    }

    async fn fetch_route(&self, from: &str, to: &str) -> Result<RouteResponse, RoutingError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("from", from),
                ("to", to),
                ("routeType", "pedestrian"),
                ("unit", "k"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RoutingError::Status(status.as_u16()));
        }

        Ok(response.json::<RouteResponse>().await?)
    }
}

/// Pulls a usable distance out of a directions response.
pub fn distance_from_response(response: &RouteResponse) -> Result<f64, RoutingError> {
    if let Some(info) = &response.info {
        if let Some(code) = info.statuscode.filter(|code| *code != 0) {
            return Err(RoutingError::Service {
                code,
                messages: info.messages.join("; "),
            });
        }
    }

    let distance = response
        .route
        .as_ref()
        .and_then(|route| route.distance)
        .ok_or(RoutingError::MissingDistance)?;

    if !distance.is_finite() || distance < 0.0 {
        return Err(RoutingError::InvalidDistance(distance));
    }

    Ok(distance)
}

#[async_trait]
impl DistanceProvider for MapQuestClient {
    async fn distance_km(&self, from: &str, to: &str) -> Result<f64, RoutingError> {
        let permit = self
            .limiter
            .acquire()
            .await
            .map_err(RoutingError::RateLimiter)?;

        let response = self.fetch_route(from, to).await;
        tracing::debug!(
            "Route {} -> {} settled in {:?} ({} requests in window, {} slots free)",
            from,
            to,
            permit.elapsed(),
            self.limiter.get_current_usage().await,
            self.limiter.in_flight_available()
        );

        distance_from_response(&response?)
    }
}
