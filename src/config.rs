// src/config.rs
//
// Startup configuration. Anything missing or malformed here is fatal:
// the process refuses to start rather than run with a half-configured
// pipeline. Feed URLs come from either FEED_URLS (comma-separated) or a
// TOML file; the file format mirrors config/feeds.toml in the repo.

use anyhow::{anyhow, Context, Result};
use chrono::Duration as ChronoDuration;
use std::fs;
use std::path::{Path, PathBuf};

use crate::detector::CheckpointMode;

const ENV_FEED_URLS: &str = "FEED_URLS";
const ENV_FEEDS_PATH: &str = "FEEDS_PATH";
const DEFAULT_FEEDS_PATH: &str = "config/feeds.toml";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub feeds: Vec<String>,
    pub lookback: ChronoDuration,
    pub checkpoint_mode: CheckpointMode,
    /// When set, a background loop runs a cycle every this many seconds.
    pub poll_interval_secs: Option<u64>,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let feeds = load_feeds()?;
        if feeds.is_empty() {
            return Err(anyhow!(
                "no feed URLs configured; set {ENV_FEED_URLS} or {ENV_FEEDS_PATH}"
            ));
        }

        let lookback_secs: i64 = env_parsed("LOOKBACK_SECS")?.unwrap_or(3600);
        if lookback_secs <= 0 {
            return Err(anyhow!("LOOKBACK_SECS must be positive"));
        }

        let checkpoint_mode = match std::env::var("CHECKPOINT_MODE") {
            Ok(v) => CheckpointMode::parse(&v)
                .ok_or_else(|| anyhow!("CHECKPOINT_MODE must be 'moving' or 'fixed', got {v:?}"))?,
            Err(_) => CheckpointMode::Moving,
        };

        let poll_interval_secs: Option<u64> = env_parsed("POLL_INTERVAL_SECS")?;
        if poll_interval_secs == Some(0) {
            return Err(anyhow!("POLL_INTERVAL_SECS must be positive when set"));
        }

        let port: u16 = env_parsed("PORT")?.unwrap_or(8080);

        Ok(Self {
            feeds,
            lookback: ChronoDuration::seconds(lookback_secs),
            checkpoint_mode,
            poll_interval_secs,
            port,
        })
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("{key}={v:?} is invalid: {e}")),
        Err(_) => Ok(None),
    }
}

/// Load feed URLs using env var + fallbacks:
/// 1) $FEED_URLS (comma-separated)
/// 2) $FEEDS_PATH (TOML file)
/// 3) config/feeds.toml
fn load_feeds() -> Result<Vec<String>> {
    if let Ok(raw) = std::env::var(ENV_FEED_URLS) {
        return Ok(clean_list(raw.split(',').map(str::to_string).collect()));
    }
    if let Ok(p) = std::env::var(ENV_FEEDS_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("{ENV_FEEDS_PATH} points to non-existent path"));
        }
        return load_feeds_from(&pb);
    }
    let fallback = PathBuf::from(DEFAULT_FEEDS_PATH);
    if fallback.exists() {
        return load_feeds_from(&fallback);
    }
    Ok(Vec::new())
}

pub fn load_feeds_from(path: &Path) -> Result<Vec<String>> {
    #[derive(serde::Deserialize)]
    struct FeedsFile {
        feeds: Vec<String>,
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading feeds from {}", path.display()))?;
    let parsed: FeedsFile = toml::from_str(&content)
        .with_context(|| format!("parsing feeds from {}", path.display()))?;
    Ok(clean_list(parsed.feeds))
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if !t.is_empty() && !out.iter().any(|o| o == t) {
            out.push(t.to_string());
        }
    }
    out
}
