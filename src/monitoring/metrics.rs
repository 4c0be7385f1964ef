use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

/// Prometheus counters for every stage of the watch pipeline.
#[derive(Clone)]
pub struct WatchMetrics {
    registry: Registry,
    pub ticks_admitted: IntCounter,
    pub ticks_gated: IntCounter,
    pub polls_failed: IntCounter,
    pub listings_changed: IntCounter,
    pub rounds_completed: IntCounter,
    pub rounds_without_distance: IntCounter,
    pub routing_samples_failed: IntCounter,
    pub near_listings: IntCounter,
    pub pulses_sent: IntCounter,
    pub pulses_failed: IntCounter,
    pub alerts_played: IntCounter,
    pub alerts_failed: IntCounter,
}

fn counter(registry: &Registry, name: &str, help: &str) -> prometheus::Result<IntCounter> {
    let counter = IntCounter::new(name, help)?;
    registry.register(Box::new(counter.clone()))?;
    Ok(counter)
}

impl WatchMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some("house_radar".to_string()), None)?;

        Ok(Self {
            ticks_admitted: counter(&registry, "ticks_admitted_total", "Scheduler ticks inside active hours")?,
            ticks_gated: counter(&registry, "ticks_gated_total", "Scheduler ticks dropped outside active hours")?,
            polls_failed: counter(&registry, "polls_failed_total", "Listing page polls that failed")?,
            listings_changed: counter(&registry, "listings_changed_total", "Accepted listing changes")?,
            rounds_completed: counter(&registry, "rounds_completed_total", "Distance rounds that settled")?,
            rounds_without_distance: counter(&registry, "rounds_without_distance_total", "Rounds where no sample was valid")?,
            routing_samples_failed: counter(&registry, "routing_samples_failed_total", "Routing requests that degraded to invalid samples")?,
            near_listings: counter(&registry, "near_listings_total", "Listings classified near a station")?,
            pulses_sent: counter(&registry, "pulses_sent_total", "Successful actuator calls")?,
            pulses_failed: counter(&registry, "pulses_failed_total", "Failed actuator calls")?,
            alerts_played: counter(&registry, "alerts_played_total", "Audio alerts played")?,
            alerts_failed: counter(&registry, "alerts_failed_total", "Audio alerts that failed to play")?,
            registry,
        })
    }

    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            tracing::warn!("Failed to encode metrics: {}", e);
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_prefixed_counters() {
        let metrics = WatchMetrics::new().unwrap();
        metrics.pulses_sent.inc();
        metrics.pulses_sent.inc();

        let text = metrics.render();
        assert!(text.contains("house_radar_pulses_sent_total 2"));
        assert!(text.contains("house_radar_ticks_gated_total 0"));
    }

    #[test]
    fn test_instances_do_not_share_counters() {
        let a = WatchMetrics::new().unwrap();
        let b = WatchMetrics::new().unwrap();
        a.near_listings.inc();
        assert_eq!(a.near_listings.get(), 1);
        assert_eq!(b.near_listings.get(), 0);
    }
}
