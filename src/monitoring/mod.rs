pub mod metrics;
pub mod server;

pub use metrics::WatchMetrics;
pub use server::start_health_server;
