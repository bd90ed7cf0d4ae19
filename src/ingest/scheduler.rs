// src/ingest/scheduler.rs
use std::sync::Arc;

use metrics::counter;
use tokio::task::JoinHandle;

use crate::pipeline::{CycleOutcome, Pipeline};

/// Spawn the timer trigger: one detection cycle every `interval_secs`.
/// Shares the pipeline (and its checkpoint lock) with the HTTP handlers,
/// so a concurrent on-demand request cannot race the timer on the
/// checkpoint.
pub fn spawn_poll_loop(pipeline: Arc<Pipeline>, interval_secs: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
        loop {
            ticker.tick().await;
            counter!("poll_ticks_total").increment(1);

            match pipeline.check_new().await {
                CycleOutcome::Fresh { count, .. } => {
                    tracing::info!(target: "poll", count, "poll tick dispatched digest");
                }
                CycleOutcome::NothingNew => {
                    tracing::debug!(target: "poll", "poll tick, nothing new");
                }
            }
        }
    })
}
