//! Demo that pushes one canned digest through the sink multiplexer
//! (log only when no channels are enabled).

use vacancy_notifier::digest;
use vacancy_notifier::ingest::rss::RssSource;
use vacancy_notifier::notify::SinkMux;

const DEMO_FEED: &str = include_str!("../../tests/fixtures/vacancies_rss.xml");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let _ = dotenvy::dotenv();

    let mux = SinkMux::from_env()?;
    if mux.is_empty() {
        tracing::warn!("no sinks enabled; digest will only be printed");
    }

    let items = RssSource::parse_items_from_str(DEMO_FEED)?;
    let body = digest::render(&items);
    let subject = format!("Test Email - New Job Postings ({})", items.len());

    mux.notify(&subject, &body).await;
    println!("{body}");
    println!("notify-demo done");
    Ok(())
}
