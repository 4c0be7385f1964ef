use serde::{Deserialize, Serialize};

/// The parts of a directions response the watcher reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub route: Option<Route>,
    #[serde(default)]
    pub info: Option<RouteInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteInfo {
    #[serde(default)]
    pub statuscode: Option<i64>,
    #[serde(default)]
    pub messages: Vec<String>,
}
