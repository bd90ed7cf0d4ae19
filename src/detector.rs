// src/detector.rs
//
// Change detection against a moving time checkpoint. The checkpoint is the
// only mutable shared state in the service; one cycle reads the threshold,
// filters, and advances the checkpoint under a single lock so concurrent
// triggers can never see overlapping thresholds or lose an update.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tokio::sync::Mutex;

use crate::ingest::types::VacancyItem;

/// Keep items published strictly after `threshold`. Items without a parsed
/// publication date are excluded; an unprovable date is never "new".
pub fn filter_new(items: &[VacancyItem], threshold: DateTime<Utc>) -> Vec<VacancyItem> {
    items
        .iter()
        .filter(|it| matches!(it.published_at, Some(ts) if ts > threshold))
        .cloned()
        .collect()
}

/// Threshold policy for a detection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointMode {
    /// Threshold is always `now - lookback`. Slow feeds may be reported
    /// again on the next cycle.
    FixedWindow,
    /// Threshold is the instant the previous cycle completed; each item is
    /// reported at most once across cycles.
    Moving,
}

impl CheckpointMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" | "fixed-window" => Some(Self::FixedWindow),
            "moving" | "moving-checkpoint" => Some(Self::Moving),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Checkpoint {
    mode: CheckpointMode,
    lookback: ChronoDuration,
    last: Mutex<DateTime<Utc>>,
}

impl Checkpoint {
    /// Starts `lookback` in the past so the first cycle reports recent items.
    pub fn new(mode: CheckpointMode, lookback: ChronoDuration, now: DateTime<Utc>) -> Self {
        Self {
            mode,
            lookback,
            last: Mutex::new(now - lookback),
        }
    }

    /// Run one detection cycle at `now`: read the threshold, filter, and
    /// advance the checkpoint, all under the same lock. The checkpoint
    /// never moves backwards.
    pub async fn cycle(&self, items: &[VacancyItem], now: DateTime<Utc>) -> Vec<VacancyItem> {
        let mut last = self.last.lock().await;
        let threshold = match self.mode {
            CheckpointMode::FixedWindow => now - self.lookback,
            CheckpointMode::Moving => *last,
        };
        let fresh = filter_new(items, threshold);
        if now > *last {
            *last = now;
        }
        fresh
    }

    pub async fn last_checked(&self) -> DateTime<Utc> {
        *self.last.lock().await
    }
}
