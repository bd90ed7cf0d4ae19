// src/ingest/mod.rs
pub mod rss;
pub mod scheduler;
pub mod types;

use crate::ingest::types::{VacancyItem, VacancySource};
use futures::future::join_all;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_items_total", "Total items parsed from feeds.");
        describe_counter!("ingest_source_errors_total", "Feed fetch/parse errors.");
        describe_histogram!("ingest_parse_ms", "Feed parse time in milliseconds.");
        describe_gauge!(
            "ingest_last_run_ts",
            "Unix ts when feed collection last ran."
        );
    });
}

/// Fetch every configured source concurrently and merge the results.
///
/// One task per source, joined as a barrier: the call returns only after
/// every fetch finished. A failing source is logged and contributes
/// nothing; it never aborts the cycle. All sources failing yields an
/// empty vec, which callers treat as "nothing found" rather than an error.
/// Ordering across sources is unspecified.
pub async fn collect_all(sources: &[Box<dyn VacancySource>]) -> Vec<VacancyItem> {
    ensure_metrics_described();

    let fetches = sources.iter().map(|s| async move {
        match s.fetch_latest().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = ?e, source = s.name(), "source error");
                counter!("ingest_source_errors_total").increment(1);
                Vec::new()
            }
        }
    });

    let merged: Vec<VacancyItem> = join_all(fetches).await.into_iter().flatten().collect();

    gauge!("ingest_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);
    merged
}
