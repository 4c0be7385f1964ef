use std::path::PathBuf;
use thiserror::Error;

/// Failures while fetching or reading the listing page.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("listing request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("listing page returned status {0}")]
    Status(u16),

    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },
}

/// Failures of a single routing request. Every variant degrades to an
/// invalid distance sample.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("routing service returned status {0}")]
    Status(u16),

    #[error("routing service reported status code {code}: {messages}")]
    Service { code: i64, messages: String },

    #[error("routing response has no distance")]
    MissingDistance,

    #[error("routing response has unusable distance {0}")]
    InvalidDistance(f64),

    #[error("rate limiter unavailable: {0}")]
    RateLimiter(String),
}

#[derive(Debug, Error)]
pub enum ActuatorError {
    #[error("actuator request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("actuator returned status {0}")]
    Status(u16),
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio player found on PATH")]
    NoPlayer,

    #[error("audio asset {0} does not exist")]
    MissingAsset(PathBuf),

    #[error("failed to launch audio player `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("audio player `{program}` exited with {status}")]
    ExitStatus { program: String, status: String },

    #[error("audio device error: {0}")]
    Device(String),

    #[error("could not decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
}
