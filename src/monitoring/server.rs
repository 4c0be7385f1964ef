use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use super::WatchMetrics;
use crate::core::HealthChecker;

/// `GET /health` as JSON and `GET /metrics` in Prometheus text format.
pub fn routes(
    health_checker: Arc<HealthChecker>,
    metrics: WatchMetrics,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::any().map(move || health_checker.clone()))
        .and_then(|checker: Arc<HealthChecker>| async move {
            let status = checker.get_status().await;
            Ok::<_, warp::Rejection>(warp::reply::json(&status))
        });

    let metrics = warp::path("metrics")
        .and(warp::path::end())
        .and(warp::get())
        .map(move || {
            warp::reply::with_header(
                metrics.render(),
                "content-type",
                "text/plain; version=0.0.4",
            )
        });

    health.or(metrics)
}

pub async fn start_health_server(
    health_checker: Arc<HealthChecker>,
    metrics: WatchMetrics,
    port: u16,
) {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    tracing::info!("✅ Health endpoint running on {}", addr);
    warp::serve(routes(health_checker, metrics)).run(addr).await;
}
