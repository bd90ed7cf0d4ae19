// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// One normalized job listing as parsed from a feed.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct VacancyItem {
    pub title: String,
    pub link: String,
    /// Publication date exactly as the feed carried it (shown in digests).
    pub published_raw: String,
    /// Parsed publication instant; `None` when the feed omitted or
    /// malformed the date. Such items are never classified as new.
    pub published_at: Option<DateTime<Utc>>,
}

#[async_trait::async_trait]
pub trait VacancySource: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<VacancyItem>>;
    fn name(&self) -> &str;
}
