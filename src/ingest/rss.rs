use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{format_description::well_known::Rfc2822, OffsetDateTime, UtcOffset};

use crate::ingest::types::{VacancyItem, VacancySource};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

/// RSS `pubDate` is RFC 2822. Anything else yields `None` and the item
/// is treated as undated.
fn parse_rfc2822(ts: &str) -> Option<DateTime<Utc>> {
    OffsetDateTime::parse(ts, &Rfc2822)
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC))
        .and_then(|dt| Utc.timestamp_opt(dt.unix_timestamp(), 0).single())
}

/// One syndication feed endpoint.
pub struct RssSource {
    name: String,
    mode: Mode,
}

enum Mode {
    /// Canned XML body, used by tests and the demo bin.
    Fixture(String),
    Http {
        url: String,
        client: reqwest::Client,
    },
}

impl RssSource {
    pub fn from_url(url: impl Into<String>, client: reqwest::Client) -> Self {
        let url = url.into();
        Self {
            name: url.clone(),
            mode: Mode::Http { url, client },
        }
    }

    pub fn from_fixture(name: impl Into<String>, xml: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: Mode::Fixture(xml.into()),
        }
    }

    pub fn parse_items_from_str(s: &str) -> Result<Vec<VacancyItem>> {
        let t0 = std::time::Instant::now();
        let rss: Rss = from_str(s).context("parsing vacancy rss xml")?;

        let mut out = Vec::with_capacity(rss.channel.item.len());
        for it in rss.channel.item {
            let title = it.title.unwrap_or_default().trim().to_string();
            let link = it.link.unwrap_or_default().trim().to_string();
            if title.is_empty() && link.is_empty() {
                continue;
            }
            let published_raw = it.pub_date.unwrap_or_default();
            let published_at = parse_rfc2822(&published_raw);

            out.push(VacancyItem {
                title,
                link,
                published_raw,
                published_at,
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);
        counter!("ingest_items_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl VacancySource for RssSource {
    async fn fetch_latest(&self) -> Result<Vec<VacancyItem>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_items_from_str(s),

            Mode::Http { url, client } => {
                let resp = client
                    .get(url)
                    .send()
                    .await
                    .with_context(|| format!("GET {url}"))?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(anyhow!("feed {url} returned {status}"));
                }
                let body = resp.text().await.with_context(|| format!("{url} body"))?;
                Self::parse_items_from_str(&body)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
