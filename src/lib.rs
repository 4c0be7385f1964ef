pub mod api;
pub mod core;
pub mod evaluation;
pub mod monitoring;
pub mod notify;
pub mod orchestrator;
pub mod scanner;

pub use orchestrator::{WatchComponents, WatchOrchestrator, WatchSettings};
