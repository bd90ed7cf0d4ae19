// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod detector;
pub mod digest;
pub mod ingest;
pub mod notify;
pub mod pipeline;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::config::AppConfig;
pub use crate::detector::{Checkpoint, CheckpointMode};
pub use crate::ingest::types::{VacancyItem, VacancySource};
pub use crate::notify::{NotificationSink, SinkMux};
pub use crate::pipeline::{CycleOutcome, Pipeline};
