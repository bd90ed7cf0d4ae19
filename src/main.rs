//! Vacancy notifier binary entrypoint.
//! Boots the Axum HTTP server, the optional poll loop, and the sinks.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vacancy_notifier::api::{self, AppState};
use vacancy_notifier::config::AppConfig;
use vacancy_notifier::detector::Checkpoint;
use vacancy_notifier::ingest::{rss::RssSource, scheduler, types::VacancySource};
use vacancy_notifier::notify::SinkMux;
use vacancy_notifier::pipeline::Pipeline;
use vacancy_notifier::telemetry::Metrics;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vacancy_notifier=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    // Invalid configuration is fatal: refuse to start.
    let cfg = AppConfig::from_env().context("loading configuration")?;

    let metrics = Metrics::init();

    let client = reqwest::Client::builder()
        .user_agent(concat!("vacancy-notifier/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()
        .context("building http client")?;

    let sources: Vec<Box<dyn VacancySource>> = cfg
        .feeds
        .iter()
        .map(|url| Box::new(RssSource::from_url(url.as_str(), client.clone())) as Box<dyn VacancySource>)
        .collect();

    let checkpoint = Checkpoint::new(cfg.checkpoint_mode, cfg.lookback, Utc::now());
    let sinks = SinkMux::from_env().context("configuring notification sinks")?;

    let pipeline = Arc::new(Pipeline::new(sources, checkpoint, sinks));

    if let Some(secs) = cfg.poll_interval_secs {
        tracing::info!(interval_secs = secs, "starting poll loop");
        scheduler::spawn_poll_loop(pipeline.clone(), secs);
    }

    let router = api::create_router(AppState {
        pipeline: pipeline.clone(),
    })
    .merge(metrics.router());

    let addr = format!("0.0.0.0:{}", cfg.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, feeds = cfg.feeds.len(), "server started");

    axum::serve(listener, router).await.context("server")?;
    Ok(())
}
