use std::time::Duration;

use anyhow::{Context, Result};
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};

use super::NotificationSink;

const DEFAULT_TOPIC: &str = "job_notifications";
const MESSAGE_KEY: &str = "job_notification";

pub struct KafkaSink {
    producer: FutureProducer,
    topic: String,
}

impl KafkaSink {
    pub fn new(brokers: &str, topic: &str) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .context("create kafka producer")?;

        tracing::info!(brokers = %brokers, topic = %topic, "kafka sink initialized");

        Ok(Self {
            producer,
            topic: topic.to_string(),
        })
    }

    /// Enabled when `KAFKA_BROKERS` is set; `KAFKA_TOPIC` defaults to
    /// `job_notifications`.
    pub fn from_env() -> Result<Option<Self>> {
        let Ok(brokers) = std::env::var("KAFKA_BROKERS") else {
            return Ok(None);
        };
        let topic = std::env::var("KAFKA_TOPIC").unwrap_or_else(|_| DEFAULT_TOPIC.to_string());
        Self::new(&brokers, &topic).map(Some)
    }
}

#[async_trait::async_trait]
impl NotificationSink for KafkaSink {
    async fn send(&self, _subject: &str, body: &str) -> Result<()> {
        let record = FutureRecord::to(&self.topic).key(MESSAGE_KEY).payload(body);

        self.producer
            .send(record, Duration::from_secs(5))
            .await
            .map_err(|(e, _)| anyhow::anyhow!("kafka publish: {e}"))?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "kafka"
    }
}
