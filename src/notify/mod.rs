// src/notify/mod.rs
pub mod email;
pub mod kafka;

use anyhow::Result;
use metrics::counter;

/// Delivery capability injected into the pipeline. Implementations are
/// fire-and-forget from the pipeline's point of view; an error is logged
/// and swallowed by the mux, never propagated into the cycle.
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, subject: &str, body: &str) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Fans one digest out to every enabled sink.
pub struct SinkMux {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl SinkMux {
    pub fn new(sinks: Vec<Box<dyn NotificationSink>>) -> Self {
        Self { sinks }
    }

    /// Build from environment. A sink is enabled when its primary env var
    /// is present (`SMTP_HOST`, `KAFKA_BROKERS`); a partially configured
    /// sink is a startup error. Zero sinks is a valid HTTP-only setup.
    pub fn from_env() -> Result<Self> {
        let mut sinks: Vec<Box<dyn NotificationSink>> = Vec::new();
        if let Some(s) = email::EmailSink::from_env()? {
            sinks.push(Box::new(s));
        }
        if let Some(s) = kafka::KafkaSink::from_env()? {
            sinks.push(Box::new(s));
        }
        if sinks.is_empty() {
            tracing::info!("no notification sinks configured; digests served over HTTP only");
        }
        Ok(Self { sinks })
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Best-effort, at-most-once: a failing sink does not stop the others
    /// and does not fail the cycle that produced the digest.
    pub async fn notify(&self, subject: &str, body: &str) {
        for sink in &self.sinks {
            if let Err(e) = sink.send(subject, body).await {
                tracing::warn!(error = ?e, sink = sink.name(), "notification delivery failed");
                counter!("notify_failures_total").increment(1);
            }
        }
    }
}
