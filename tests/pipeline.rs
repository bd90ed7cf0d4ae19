// tests/pipeline.rs
//
// Full-cycle behavior with mock sources and sink doubles: partial-failure
// tolerance, the "nothing new" outcome, checkpoint semantics across cycles,
// and at-most-once delivery when a sink fails.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use vacancy_notifier::detector::{Checkpoint, CheckpointMode};
use vacancy_notifier::ingest::types::{VacancyItem, VacancySource};
use vacancy_notifier::notify::{NotificationSink, SinkMux};
use vacancy_notifier::pipeline::{CycleOutcome, Pipeline};

struct MockSource {
    name: &'static str,
    items: Vec<VacancyItem>,
}

#[async_trait]
impl VacancySource for MockSource {
    async fn fetch_latest(&self) -> Result<Vec<VacancyItem>> {
        Ok(self.items.clone())
    }
    fn name(&self) -> &str {
        self.name
    }
}

/// Stands in for a source that timed out or returned garbage.
struct BrokenSource;

#[async_trait]
impl VacancySource for BrokenSource {
    async fn fetch_latest(&self) -> Result<Vec<VacancyItem>> {
        Err(anyhow!("connection timed out"))
    }
    fn name(&self) -> &str {
        "broken"
    }
}

#[derive(Clone, Default)]
struct RecordingSink {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
    fn name(&self) -> &'static str {
        "recording"
    }
}

struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
    async fn send(&self, _subject: &str, _body: &str) -> Result<()> {
        Err(anyhow!("broker unreachable"))
    }
    fn name(&self) -> &'static str {
        "failing"
    }
}

fn vacancy(title: &str, published_at: Option<DateTime<Utc>>) -> VacancyItem {
    VacancyItem {
        title: title.to_string(),
        link: format!("https://example.test/{title}"),
        published_raw: published_at
            .map(|t| t.to_rfc2822())
            .unwrap_or_else(|| "unknown".to_string()),
        published_at,
    }
}

fn pipeline_with(
    sources: Vec<Box<dyn VacancySource>>,
    sinks: Vec<Box<dyn NotificationSink>>,
) -> Pipeline {
    // Checkpoint starts one hour in the past, like the service default.
    let checkpoint = Checkpoint::new(CheckpointMode::Moving, Duration::hours(1), Utc::now());
    Pipeline::new(sources, checkpoint, SinkMux::new(sinks))
}

#[tokio::test]
async fn two_sources_future_items_are_both_reported() {
    let now = Utc::now();
    let sources: Vec<Box<dyn VacancySource>> = vec![
        Box::new(MockSource {
            name: "a",
            items: vec![vacancy("one", Some(now + Duration::hours(1)))],
        }),
        Box::new(MockSource {
            name: "b",
            items: vec![vacancy("two", Some(now + Duration::hours(2)))],
        }),
    ];
    let pipeline = pipeline_with(sources, vec![]);

    match pipeline.check_new().await {
        CycleOutcome::Fresh { digest, count } => {
            assert_eq!(count, 2);
            assert!(digest.contains("one"));
            assert!(digest.contains("two"));
        }
        CycleOutcome::NothingNew => panic!("expected fresh items"),
    }
}

#[tokio::test]
async fn one_broken_source_does_not_abort_the_cycle() {
    let now = Utc::now();
    let sources: Vec<Box<dyn VacancySource>> = vec![
        Box::new(BrokenSource),
        Box::new(MockSource {
            name: "ok",
            items: vec![vacancy("survivor", Some(now - Duration::minutes(30)))],
        }),
    ];
    let pipeline = pipeline_with(sources, vec![]);

    match pipeline.check_new().await {
        CycleOutcome::Fresh { digest, count } => {
            assert_eq!(count, 1);
            assert!(digest.contains("survivor"));
        }
        CycleOutcome::NothingNew => panic!("surviving source's item should be reported"),
    }
}

#[tokio::test]
async fn all_sources_failing_is_nothing_new_not_an_error() {
    let sources: Vec<Box<dyn VacancySource>> =
        vec![Box::new(BrokenSource), Box::new(BrokenSource)];
    let pipeline = pipeline_with(sources, vec![]);
    assert_eq!(pipeline.check_new().await, CycleOutcome::NothingNew);
    assert!(pipeline.snapshot_all().await.is_none());
}

#[tokio::test]
async fn stale_items_only_reports_nothing_new() {
    let now = Utc::now();
    let sources: Vec<Box<dyn VacancySource>> = vec![Box::new(MockSource {
        name: "stale",
        items: vec![
            vacancy("old", Some(now - Duration::hours(2))),
            vacancy("older", Some(now - Duration::hours(3))),
        ],
    })];
    let pipeline = pipeline_with(sources, vec![]);
    assert_eq!(pipeline.check_new().await, CycleOutcome::NothingNew);
}

#[tokio::test]
async fn undated_item_is_skipped_but_valid_one_reported() {
    let now = Utc::now();
    let sources: Vec<Box<dyn VacancySource>> = vec![Box::new(MockSource {
        name: "mixed",
        items: vec![
            vacancy("undated", None),
            vacancy("fresh", Some(now + Duration::minutes(5))),
        ],
    })];
    let pipeline = pipeline_with(sources, vec![]);

    match pipeline.check_new().await {
        CycleOutcome::Fresh { digest, count } => {
            assert_eq!(count, 1);
            assert!(digest.contains("fresh"));
            assert!(!digest.contains("undated"));
        }
        CycleOutcome::NothingNew => panic!("the dated item is new"),
    }
}

#[tokio::test]
async fn second_cycle_does_not_repeat_items_in_moving_mode() {
    let now = Utc::now();
    let sources: Vec<Box<dyn VacancySource>> = vec![Box::new(MockSource {
        name: "a",
        items: vec![vacancy("once", Some(now - Duration::minutes(10)))],
    })];
    let pipeline = pipeline_with(sources, vec![]);

    assert!(matches!(
        pipeline.check_new().await,
        CycleOutcome::Fresh { count: 1, .. }
    ));
    // Same feed content on the very next cycle: already reported.
    assert_eq!(pipeline.check_new().await, CycleOutcome::NothingNew);
}

#[tokio::test]
async fn sink_failure_still_returns_digest_and_advances_checkpoint() {
    let now = Utc::now();
    let recording = RecordingSink::default();
    let sent = recording.sent.clone();

    let sources: Vec<Box<dyn VacancySource>> = vec![Box::new(MockSource {
        name: "a",
        items: vec![vacancy("delivered-anyway", Some(now - Duration::minutes(5)))],
    })];
    let pipeline = pipeline_with(
        sources,
        vec![Box::new(FailingSink), Box::new(recording)],
    );

    let before = pipeline.checkpoint().last_checked().await;
    let outcome = pipeline.check_new().await;
    let after = pipeline.checkpoint().last_checked().await;

    // Caller still gets the digest despite the failing sink.
    match outcome {
        CycleOutcome::Fresh { digest, .. } => assert!(digest.contains("delivered-anyway")),
        CycleOutcome::NothingNew => panic!("expected a digest"),
    }
    // Later sinks in the mux still ran.
    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].0.contains("New Job Postings (1)"));
    // Checkpoint advanced; the digest will not be retried next cycle.
    assert!(after > before);
}

#[tokio::test]
async fn subject_carries_item_count_and_body_is_digest() {
    let now = Utc::now();
    let recording = RecordingSink::default();
    let sent = recording.sent.clone();

    let sources: Vec<Box<dyn VacancySource>> = vec![Box::new(MockSource {
        name: "a",
        items: vec![
            vacancy("first", Some(now + Duration::minutes(1))),
            vacancy("second", Some(now + Duration::minutes(2))),
        ],
    })];
    let pipeline = pipeline_with(sources, vec![Box::new(recording)]);
    pipeline.check_new().await;

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let (subject, body) = &sent[0];
    assert_eq!(subject, "New Job Postings (2)");
    assert!(body.contains("🔹 first"));
    assert!(body.contains("🔹 second"));
}
