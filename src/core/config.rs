use anyhow::{bail, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::scanner::listing_source::{ADDRESS_SELECTOR, BADGE_SELECTOR, CONTAINER_SELECTOR};

#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceConfig,
    pub routing: RoutingConfig,
    pub actuator: ActuatorConfig,
    pub audio: AudioConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub listing_url: String,
    pub poll_interval_secs: u64,
    /// Ticks are admitted when `active_after_hour < hour <= active_until_hour`.
    pub active_after_hour: u32,
    pub active_until_hour: u32,
    pub timeout_secs: u64,
    pub max_entries: usize,
    pub user_agent: String,
    /// CSS selectors for one listing entry, its address anchor and its badge.
    pub container_selector: String,
    pub address_selector: String,
    pub badge_selector: String,
}

#[derive(Debug, Clone)]
pub struct RoutingConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_requests_per_sec: usize,
    pub max_in_flight: usize,
    pub near_threshold_km: f64,
    pub reference_addresses_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ActuatorConfig {
    pub command_url: String,
    pub pulse_count: u32,
    pub pulse_interval_ms: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub assets_dir: PathBuf,
    pub player: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MonitoringConfig {
    pub health_port: u16,
    pub log_level: String,
    pub event_bus_capacity: usize,
}

impl SourceConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl ActuatorConfig {
    pub fn pulse_interval(&self) -> Duration {
        Duration::from_millis(self.pulse_interval_ms)
    }
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

fn string_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            source: SourceConfig {
                listing_url: string_or("LISTING_URL", ""),
                poll_interval_secs: parsed_or("POLL_INTERVAL_SECS", 60),
                active_after_hour: parsed_or("ACTIVE_AFTER_HOUR", 7),
                active_until_hour: parsed_or("ACTIVE_UNTIL_HOUR", 23),
                timeout_secs: parsed_or("SOURCE_TIMEOUT_SECS", 15),
                max_entries: parsed_or("MAX_LISTING_ENTRIES", 20),
                user_agent: string_or(
                    "USER_AGENT",
                    concat!("house-radar/", env!("CARGO_PKG_VERSION")),
                ),
                container_selector: string_or("LISTING_CONTAINER_SELECTOR", CONTAINER_SELECTOR),
                address_selector: string_or("LISTING_ADDRESS_SELECTOR", ADDRESS_SELECTOR),
                badge_selector: string_or("LISTING_BADGE_SELECTOR", BADGE_SELECTOR),
            },
            routing: RoutingConfig {
                api_key: string_or("ROUTING_API_KEY", ""),
                base_url: string_or(
                    "ROUTING_BASE_URL",
                    "https://www.mapquestapi.com/directions/v2/route",
                ),
                timeout_secs: parsed_or("ROUTING_TIMEOUT_SECS", 10),
                max_requests_per_sec: parsed_or("ROUTING_MAX_REQUESTS_PER_SEC", 20),
                max_in_flight: parsed_or("ROUTING_MAX_IN_FLIGHT", 10),
                near_threshold_km: parsed_or("NEAR_THRESHOLD_KM", 1.5),
                reference_addresses_file: optional("REFERENCE_ADDRESSES_FILE").map(PathBuf::from),
            },
            actuator: ActuatorConfig {
                command_url: string_or("ACTUATOR_COMMAND_URL", ""),
                pulse_count: parsed_or("PULSE_COUNT", 6),
                pulse_interval_ms: parsed_or("PULSE_INTERVAL_MS", 1500),
                timeout_secs: parsed_or("ACTUATOR_TIMEOUT_SECS", 5),
            },
            audio: AudioConfig {
                assets_dir: PathBuf::from(string_or("AUDIO_ASSETS_DIR", "./assets")),
                player: optional("AUDIO_PLAYER"),
            },
            monitoring: MonitoringConfig {
                health_port: parsed_or("HEALTH_PORT", 3000),
                log_level: string_or("LOG_LEVEL", "info"),
                event_bus_capacity: parsed_or("EVENT_BUS_CAPACITY", 64),
            },
        })
    }

    /// Checks the values the watcher cannot run without.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.source.listing_url.trim().is_empty() {
            missing.push("LISTING_URL");
        }
        if self.actuator.command_url.trim().is_empty() {
            missing.push("ACTUATOR_COMMAND_URL");
        }
        if self.routing.api_key.trim().is_empty() {
            missing.push("ROUTING_API_KEY");
        }
        if !missing.is_empty() {
            bail!("missing required configuration: {}", missing.join(", "));
        }

        if self.source.active_after_hour > 23 || self.source.active_until_hour > 23 {
            bail!(
                "active hours must be within 0..=23 (got {}..={})",
                self.source.active_after_hour,
                self.source.active_until_hour
            );
        }
        if self.source.poll_interval_secs == 0 {
            bail!("POLL_INTERVAL_SECS must be greater than zero");
        }
        if !self.routing.near_threshold_km.is_finite() || self.routing.near_threshold_km < 0.0 {
            bail!("NEAR_THRESHOLD_KM must be a non-negative number");
        }
        if self.routing.max_in_flight == 0 || self.routing.max_requests_per_sec == 0 {
            bail!("routing rate limits must be greater than zero");
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        source: SourceConfig {
            listing_url: "http://listings.test/".to_string(),
            poll_interval_secs: 60,
            active_after_hour: 7,
            active_until_hour: 23,
            timeout_secs: 5,
            max_entries: 20,
            user_agent: "house-radar-test".to_string(),
            container_selector: CONTAINER_SELECTOR.to_string(),
            address_selector: ADDRESS_SELECTOR.to_string(),
            badge_selector: BADGE_SELECTOR.to_string(),
        },
        routing: RoutingConfig {
            api_key: "key".to_string(),
            base_url: "http://routing.test/route".to_string(),
            timeout_secs: 5,
            max_requests_per_sec: 100,
            max_in_flight: 10,
            near_threshold_km: 1.5,
            reference_addresses_file: None,
        },
        actuator: ActuatorConfig {
            command_url: "http://actuator.test/pulse".to_string(),
            pulse_count: 6,
            pulse_interval_ms: 1500,
            timeout_secs: 5,
        },
        audio: AudioConfig {
            assets_dir: PathBuf::from("./assets"),
            player: None,
        },
        monitoring: MonitoringConfig {
            health_port: 0,
            log_level: "debug".to_string(),
            event_bus_capacity: 16,
        },
    }
}
