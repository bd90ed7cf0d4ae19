// src/pipeline.rs
//
// One detection cycle end to end: collect feeds, run change detection
// against the shared checkpoint, render the digest, hand it to the sinks.
// Both trigger surfaces (HTTP handlers, timer) go through this type, so
// the single-writer checkpoint discipline holds regardless of who fires.

use chrono::Utc;
use metrics::counter;

use crate::detector::Checkpoint;
use crate::digest;
use crate::ingest::{self, types::VacancySource};
use crate::notify::SinkMux;

/// Result of one "what's new" cycle. "Nothing new" is an ordinary outcome,
/// distinct from any error; callers map it to a not-found response rather
/// than a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Fresh { digest: String, count: usize },
    NothingNew,
}

pub struct Pipeline {
    sources: Vec<Box<dyn VacancySource>>,
    checkpoint: Checkpoint,
    sinks: SinkMux,
}

impl Pipeline {
    pub fn new(sources: Vec<Box<dyn VacancySource>>, checkpoint: Checkpoint, sinks: SinkMux) -> Self {
        Self {
            sources,
            checkpoint,
            sinks,
        }
    }

    pub fn checkpoint(&self) -> &Checkpoint {
        &self.checkpoint
    }

    /// Run one full cycle. The checkpoint advances whether or not anything
    /// new was found, and whether or not sink delivery succeeds; an
    /// undelivered digest is not retried on a later cycle (at-most-once).
    /// The digest is returned to the caller even when every sink failed.
    pub async fn check_new(&self) -> CycleOutcome {
        counter!("cycles_total").increment(1);

        let all = ingest::collect_all(&self.sources).await;
        let fresh = self.checkpoint.cycle(&all, Utc::now()).await;

        if fresh.is_empty() {
            tracing::info!(fetched = all.len(), "cycle finished, nothing new");
            return CycleOutcome::NothingNew;
        }

        let body = digest::render(&fresh);
        let subject = format!("New Job Postings ({})", fresh.len());
        tracing::info!(fetched = all.len(), fresh = fresh.len(), "cycle found new vacancies");

        self.sinks.notify(&subject, &body).await;

        CycleOutcome::Fresh {
            digest: body,
            count: fresh.len(),
        }
    }

    /// Report everything the feeds currently carry, without touching the
    /// checkpoint or the sinks. `None` when every source came back empty.
    pub async fn snapshot_all(&self) -> Option<String> {
        let all = ingest::collect_all(&self.sources).await;
        if all.is_empty() {
            return None;
        }
        Some(digest::render(&all))
    }
}
