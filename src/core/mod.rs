pub mod config;
pub mod error;
pub mod event_bus;
pub mod health;
pub mod logging;

pub use config::Config;
pub use error::{ActuatorError, AudioError, RoutingError, SourceError};
pub use event_bus::{EventBus, WatchEvent};
pub use health::{Component, HealthChecker};
