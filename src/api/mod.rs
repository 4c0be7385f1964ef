pub mod actuator;
pub mod rate_limiter;
pub mod routing;
pub mod types;

pub use actuator::{Actuator, HttpActuator};
pub use rate_limiter::{RateLimiter, RateLimiterConfig};
pub use routing::{DistanceProvider, MapQuestClient};
pub use types::*;
